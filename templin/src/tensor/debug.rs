use crate::tensor::{Dims, ITensor, Tensor, TensorBase, TensorView, TensorViewMut};
use std::fmt::{Debug, Formatter, Write};

fn fmt_separated<I, T>(
    iter: &mut I,
    f: &mut Formatter,
    sep: &str,
    fmt: &mut impl FnMut(T, &mut Formatter) -> std::fmt::Result,
    limit: usize,
) -> std::fmt::Result
where
    I: Iterator<Item = T>,
{
    let mut first = true;
    for el in iter.take(limit) {
        if first {
            first = false;
        } else {
            f.write_str(sep)?;
        }
        fmt(el, f)?;
    }
    Ok(())
}

fn fmt_separated_max<I, T>(
    mut iter: I,
    len: usize,
    max: usize,
    f: &mut Formatter,
    sep: &str,
    fmt: &mut impl FnMut(T, &mut Formatter) -> std::fmt::Result,
) -> std::fmt::Result
where
    I: Iterator<Item = T>,
{
    if len > max {
        let limit = max / 2;
        let to_skip = len - (limit * 2);
        fmt_separated(&mut iter, f, sep, fmt, limit)?;
        f.write_str(sep)?;
        write!(f, "...({to_skip} hidden)")?;
        f.write_str(sep)?;
        iter.nth(to_skip - 1);
        fmt_separated(&mut iter, f, sep, fmt, limit)
    } else {
        fmt_separated(&mut iter, f, sep, fmt, len)
    }
}

const DEBUG_LIMIT_DIM_OUTER: usize = 5;
const DEBUG_LIMIT_DIM_INNER: usize = 10;

fn fmt_tensor_data<T, D>(t: TensorView<T, D>, f: &mut Formatter, depth: usize) -> std::fmt::Result
where
    T: Debug,
    D: Dims,
{
    f.write_char('[')?;
    if t.len() > 0 {
        if D::N < 2 {
            fmt_separated_max(t.iter(), t.len(), DEBUG_LIMIT_DIM_INNER, f, ", ", &mut |el, f| {
                Debug::fmt(el, f)
            })?;
        } else {
            let indent = "   ".repeat(depth);
            let sep = format!(",\n{indent}   ");
            write!(f, "\n{indent}   ")?;
            fmt_separated_max(
                t.iter_major_axis(),
                t.dims().first(),
                DEBUG_LIMIT_DIM_OUTER,
                f,
                sep.as_str(),
                &mut |el, f| fmt_tensor_data(el, f, depth + 1),
            )?;
            write!(f, "\n{indent}")?;
        }
    }
    f.write_char(']')
}

fn format_tensor<T, D>(t: TensorView<T, D>, f: &mut Formatter) -> std::fmt::Result
where
    T: Debug,
    D: Dims,
{
    let suffix = format!(
        " dtype={} dims={} len={}",
        std::any::type_name::<T>(),
        t.dims(),
        t.len()
    );
    fmt_tensor_data(t, f, 0)?;
    f.write_str(suffix.as_str())
}

impl<T: Debug, D: Dims> Debug for Tensor<T, D> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        format_tensor(self.view(), f)
    }
}

impl<'a, T: Debug, D: Dims> Debug for TensorView<'a, T, D> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        format_tensor(*self, f)
    }
}

impl<'a, T: Debug, D: Dims> Debug for TensorViewMut<'a, T, D> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        format_tensor(self.view(), f)
    }
}
