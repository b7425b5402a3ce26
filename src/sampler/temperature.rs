// Reduces raw sensor readings to main / max / per-core temperatures.

use crate::models::TemperatureStats;

/// One hardware sensor as reported by the OS.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub label: String,
    pub current: Option<f32>,
    /// Highest value the sensor has reported so far.
    pub max: Option<f32>,
}

const CPU_LABEL_HINTS: [&str; 4] = ["cpu", "package", "tctl", "tdie"];

/// `None` when no sensor has a usable current reading.
pub fn summarize(sensors: &[SensorReading]) -> Option<TemperatureStats> {
    let readable: Vec<(&str, f64)> = sensors
        .iter()
        .filter_map(|s| {
            s.current
                .filter(|t| t.is_finite())
                .map(|t| (s.label.as_str(), t as f64))
        })
        .collect();
    if readable.is_empty() {
        return None;
    }

    let main = readable
        .iter()
        .find(|(label, _)| {
            let l = label.to_ascii_lowercase();
            CPU_LABEL_HINTS.iter().any(|h| l.contains(h))
        })
        .or_else(|| readable.first())
        .map(|(_, t)| *t);

    // Only sensors that produced a reading this round count; thresholds are not readings.
    let max = sensors
        .iter()
        .filter(|s| s.current.is_some_and(f32::is_finite))
        .flat_map(|s| [s.current, s.max])
        .flatten()
        .filter(|t| t.is_finite())
        .map(|t| t as f64)
        .fold(None, |acc: Option<f64>, t| Some(acc.map_or(t, |a| a.max(t))));

    let mut cores: Vec<(u32, f64)> = readable
        .iter()
        .filter_map(|(label, t)| core_index(label).map(|i| (i, *t)))
        .collect();
    cores.sort_by_key(|(i, _)| *i);

    Some(TemperatureStats {
        main,
        max,
        cores: cores.into_iter().map(|(_, t)| t).collect(),
    })
}

/// Index from labels like "Core 3" or "coretemp Core 12".
fn core_index(label: &str) -> Option<u32> {
    let lower = label.to_ascii_lowercase();
    let rest = &lower[lower.find("core ")? + "core ".len()..];
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sensor(label: &str, current: Option<f32>, max: Option<f32>) -> SensorReading {
        SensorReading {
            label: label.into(),
            current,
            max,
        }
    }

    #[test]
    fn no_sensors_is_absent() {
        assert_eq!(summarize(&[]), None);
        assert_eq!(summarize(&[sensor("acpitz", None, Some(90.0))]), None);
    }

    #[test]
    fn package_sensor_is_main_and_cores_are_ordered() {
        let sensors = [
            sensor("nvme Composite", Some(38.0), None),
            sensor("coretemp Core 1", Some(51.0), Some(100.0)),
            sensor("coretemp Package id 0", Some(55.0), Some(100.0)),
            sensor("coretemp Core 0", Some(49.0), Some(100.0)),
        ];
        let t = summarize(&sensors).unwrap();
        assert_eq!(t.main, Some(55.0));
        assert_eq!(t.max, Some(100.0));
        assert_eq!(t.cores, vec![49.0, 51.0]);
    }

    #[test]
    fn falls_back_to_first_readable_sensor() {
        let t = summarize(&[sensor("acpitz", Some(42.0), None)]).unwrap();
        assert_eq!(t.main, Some(42.0));
        assert_eq!(t.max, Some(42.0));
        assert!(t.cores.is_empty());
    }

    #[test]
    fn max_ignores_sensors_without_a_reading() {
        let sensors = [
            sensor("acpitz", None, Some(90.0)),
            sensor("k10temp Tctl", Some(61.5), None),
            sensor("nvme Composite", Some(40.0), Some(64.0)),
        ];
        let t = summarize(&sensors).unwrap();
        assert_eq!(t.main, Some(61.5));
        assert_eq!(t.max, Some(64.0));
    }

    #[test]
    fn core_index_parses_trailing_number() {
        assert_eq!(core_index("Core 12"), Some(12));
        assert_eq!(core_index("k10temp Tctl"), None);
    }
}
