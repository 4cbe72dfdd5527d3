//! Demo run: register the configured modalities, route them through a
//! capability dispatch table, then draw a presence mask with one column
//! per modality.

use serde::Serialize;

use modalmask::{
    Dispatcher, MaskError, MaskGenerator, Modality, ModalityError, PresenceMask, SharedRegistry,
};

use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("modality registry error: {0}")]
    Modality(#[from] ModalityError),
    #[error("mask generation error: {0}")]
    Mask(#[from] MaskError),
}

#[derive(Debug, Clone, Serialize)]
pub struct ModalityEntry {
    pub name: String,
    pub bits: u64,
    pub route: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MaskSummary {
    pub seed: u64,
    pub n_samples: usize,
    pub n_modalities: usize,
    pub missing_fraction: Vec<f64>,
    pub rows_without_presence: usize,
    pub rows: Vec<Vec<u8>>,
}

impl From<&PresenceMask> for MaskSummary {
    fn from(mask: &PresenceMask) -> Self {
        Self {
            seed: mask.seed(),
            n_samples: mask.n_samples(),
            n_modalities: mask.n_modalities(),
            missing_fraction: (0..mask.n_modalities())
                .map(|col| mask.missing_fraction(col))
                .collect(),
            rows_without_presence: mask.rows_without_presence().len(),
            rows: mask.to_rows(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DemoReport {
    pub modalities: Vec<ModalityEntry>,
    pub combined: ModalityEntry,
    pub mask: MaskSummary,
}

/// Routing table mirroring a typical multimodal pipeline
pub fn processing_table(registry: &SharedRegistry) -> Dispatcher<String> {
    let render = {
        let registry = registry.clone();
        move |tag: Modality| registry.render(tag)
    };
    let (r1, r2, r3) = (render.clone(), render.clone(), render.clone());

    Dispatcher::new()
        .exact(Modality::INVALID, |_| "invalid modality".to_string())
        .exact(Modality::IMAGE, move |tag| format!("image only: {}", r1(tag)))
        .exact(Modality::TEXT, move |tag| format!("text only: {}", r2(tag)))
        .covers(Modality::IMAGE | Modality::TEXT, move |tag| {
            format!("image and text: {}", r3(tag))
        })
        .covers(Modality::AUDIO | Modality::TEXT, move |tag| {
            format!("audio and text: {}", render(tag))
        })
        .fallback(|_| "other combination".to_string())
}

pub fn run(config: &Config) -> Result<DemoReport, DemoError> {
    let registry = SharedRegistry::new();

    let mut tags = Vec::with_capacity(config.modalities.len());
    for name in &config.modalities {
        let tag = match registry.lookup(name) {
            Some(tag) => tag,
            None => {
                let tag = registry.register(Some(name.as_str()), None)?;
                tracing::info!(name = %name, bits = tag.bits(), "registered custom modality");
                tag
            }
        };
        tags.push(tag);
    }

    let table = processing_table(&registry);
    let entry = |tag: Modality| ModalityEntry {
        name: registry.render(tag),
        bits: tag.bits(),
        route: table.dispatch(tag),
    };

    let modalities: Vec<ModalityEntry> = tags.iter().map(|&tag| entry(tag)).collect();
    let combined = entry(tags.iter().fold(Modality::INVALID, |acc, &tag| acc | tag));

    let generator = MaskGenerator::from_options(&config.mask_options())?;
    let mask = generator.generate();
    tracing::info!(
        seed = mask.seed(),
        samples = mask.n_samples(),
        modalities = mask.n_modalities(),
        reservation = generator.reservation().as_str(),
        "presence mask generated"
    );

    Ok(DemoReport {
        modalities,
        combined,
        mask: MaskSummary::from(&mask),
    })
}
