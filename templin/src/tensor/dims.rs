use std::fmt::{Debug, Display, Formatter};

/// Shape of a row-major tensor. `Less` is the shape of one sub-tensor along the first axis.
pub trait Dims: Copy + Debug + Eq + Display {
    const N: usize;
    type Less: Dims;
    fn first(&self) -> usize;
    fn tensor_len(&self) -> usize;
    fn without_first_axis(&self) -> Self::Less;
    fn with_resized_first_axis(&self, size: usize) -> Self;
}

/// Shape of a scalar.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Dim0;

impl Dims for Dim0 {
    const N: usize = 0;
    type Less = Dim0;
    #[inline]
    fn first(&self) -> usize {
        1
    }
    #[inline]
    fn tensor_len(&self) -> usize {
        1
    }
    fn without_first_axis(&self) -> Dim0 {
        Dim0
    }
    fn with_resized_first_axis(&self, _size: usize) -> Dim0 {
        Dim0
    }
}

impl Display for Dim0 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("()")
    }
}

macro_rules! impl_dims {
    (@usize $x:ident) => { usize };
    ($name:ident($first:ident $(, $rest:ident)*), $n:literal, $less:ident $(($($sub:ident),*))?) => {
        #[derive(Copy, Clone, Debug, Eq, PartialEq)]
        pub struct $name(pub usize $(, pub impl_dims!(@usize $rest))*);

        impl Dims for $name {
            const N: usize = $n;
            type Less = $less;
            #[inline]
            fn first(&self) -> usize {
                self.0
            }
            #[inline]
            fn tensor_len(&self) -> usize {
                let &$name($first $(, $rest)*) = self;
                $first $(* $rest)*
            }
            #[allow(unused_variables)]
            fn without_first_axis(&self) -> $less {
                let &$name($first $(, $rest)*) = self;
                $less $(($($sub),*))?
            }
            #[allow(unused_variables)]
            fn with_resized_first_axis(&self, size: usize) -> Self {
                let &$name($first $(, $rest)*) = self;
                $name(size $(, $rest)*)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                let &$name($first $(, $rest)*) = self;
                write!(f, "({}", $first)?;
                $(write!(f, ", {}", $rest)?;)*
                f.write_str(")")
            }
        }
    };
}

impl_dims!(Dim1(len), 1, Dim0);
impl_dims!(Dim2(rows, cols), 2, Dim1(cols));
impl_dims!(Dim3(count, rows, cols), 3, Dim2(rows, cols));

impl Dim2 {
    #[inline]
    pub fn rows(&self) -> usize {
        self.0
    }
    #[inline]
    pub fn cols(&self) -> usize {
        self.1
    }
}
