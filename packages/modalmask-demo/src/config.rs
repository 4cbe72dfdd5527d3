use modalmask::{MaskOptions, MissingRate, ReservationPolicy};

use crate::logging::LogSettings;

const DEFAULT_MODALITIES: [&str; 3] = ["image", "text", "audio"];
const DEFAULT_SAMPLES: usize = 10;
const DEFAULT_MISSING_RATE: f64 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Modality names, one mask column each
    pub modalities: Vec<String>,
    pub samples: usize,
    pub missing_rate: MissingRate,
    pub seed: Option<u64>,
    pub reservation: ReservationPolicy,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparseable values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let modalities = lookup("MODALITIES")
            .map(|value| split_list(&value))
            .filter(|names| !names.is_empty())
            .unwrap_or_else(|| DEFAULT_MODALITIES.iter().map(|s| s.to_string()).collect());

        let samples = lookup("SAMPLES")
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_SAMPLES);

        let missing_rate = lookup("MISSING_RATE")
            .and_then(|value| parse_missing_rate(&value))
            .unwrap_or(MissingRate::Uniform(DEFAULT_MISSING_RATE));

        let seed = lookup("SEED").and_then(|value| value.trim().parse::<u64>().ok());

        let reservation = lookup("RESERVATION")
            .and_then(|value| ReservationPolicy::from_name(&value))
            .unwrap_or_default();

        let log_level = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let file_logs = lookup("ENABLE_FILE_LOGS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let log_dir = file_logs.then(|| lookup("LOG_DIR").unwrap_or_else(|| "./logs".to_string()));

        Self {
            modalities,
            samples,
            missing_rate,
            seed,
            reservation,
            log_level,
            log_dir,
        }
    }

    pub fn mask_options(&self) -> MaskOptions {
        MaskOptions {
            n_modalities: self.modalities.len(),
            n_samples: self.samples,
            missing_rate: self.missing_rate.clone(),
            seed: self.seed,
            reservation: self.reservation,
        }
    }

    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            level: self.log_level.clone(),
            file_dir: self.log_dir.clone(),
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// `0.3` for a uniform rate, `0.3,0.4,0.5` for one rate per modality
fn parse_missing_rate(value: &str) -> Option<MissingRate> {
    let rates = split_list(value)
        .iter()
        .map(|item| item.parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;

    match rates.as_slice() {
        [] => None,
        [rate] => Some(MissingRate::Uniform(*rate)),
        _ => Some(MissingRate::PerModality(rates)),
    }
}
