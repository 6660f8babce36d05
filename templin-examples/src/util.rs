use templin::bias::BiasSource;
use templin::scoring::ScoreReport;
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber that also receives `log` records, filtered by `RUST_LOG` and
/// defaulting to `info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // a second initialization, e.g. from tests, keeps the first subscriber
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Parses `zero`, `random` or ten comma separated floats into a bias source.
pub fn parse_bias(value: &str, seed: Option<u64>) -> Result<BiasSource, String> {
    match value.trim() {
        "zero" => Ok(BiasSource::Zero),
        "random" => Ok(BiasSource::Random { seed }),
        list => list
            .split(',')
            .map(|v| v.trim().parse::<f32>().map_err(|e| format!("invalid bias value '{v}': {e}")))
            .collect::<Result<Vec<f32>, String>>()
            .map(BiasSource::Fixed),
    }
}

pub fn print_report(report: &ScoreReport) {
    println!("Accuracy: {:.2}% ({}/{})", report.accuracy, report.correct, report.total);
    println!("Per class:");
    for (class, accuracy) in report.per_class_accuracy.iter().enumerate() {
        match accuracy {
            Some(accuracy) => println!("  {class}: {accuracy:6.2}%"),
            None => println!("  {class}:    n/a"),
        }
    }
    println!("Confusion matrix (rows expected, columns predicted):");
    for row in &report.confusion {
        let cells: Vec<String> = row.iter().map(|c| format!("{c:5}")).collect();
        println!("  {}", cells.join(" "));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_bias() {
        assert_eq!(parse_bias("zero", None), Ok(BiasSource::Zero));
        assert_eq!(parse_bias("random", Some(4)), Ok(BiasSource::Random { seed: Some(4) }));
        assert_eq!(
            parse_bias("0, 1,2,3,4,5,6,7,8,-9.5", None),
            Ok(BiasSource::Fixed(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, -9.5]))
        );
        assert!(parse_bias("1,x", None).is_err());
    }
}
