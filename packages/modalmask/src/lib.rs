//! # modalmask - multimodal capability tags and missing-modality masks
//!
//! Two facilities for multimodal machine-learning pipelines:
//!
//! - **Modality tags** - an open, composable set of bit flags naming the data
//!   modalities a sample carries (image, text, audio, ...), with parsing,
//!   canonical rendering and runtime registration
//! - **Presence masks** - seeded generation of a samples x modalities binary
//!   matrix hitting a requested missing rate per modality while keeping at
//!   least one observed modality per sample
//!
//! The two share no state: callers pick the tags relevant to their pipeline,
//! then ask for a mask with one column per tag.
//!
//! ## Modules
//!
//! - [`modality`] - tag value, registry, shared registry handle
//! - [`dispatch`] - ordered capability dispatch over tags
//! - [`mask`] - presence-mask generator
//! - [`sanitize`] - rate validation and feasibility
//! - [`types`] - shared constants and input types
//!
//! ## Example
//!
//! ```rust
//! use modalmask::{mask, ModalityRegistry};
//!
//! let mut registry = ModalityRegistry::new();
//! let video = registry.register(Some("video"), None).unwrap();
//! let tags = ["image", "text", "video"].map(|name| registry.parse(name));
//! assert_eq!(tags[2], video);
//!
//! let presence = mask::generate(tags.len(), 100, 0.4, Some(7)).unwrap();
//! assert_eq!(presence.missing_count(1), 40);
//! ```

#![deny(clippy::all)]

pub mod dispatch;
pub mod mask;
pub mod modality;
pub mod sanitize;
pub mod types;

// 重新导出主要类型
pub use dispatch::{Dispatcher, Rule};
pub use mask::{generate, generate_batch, MaskError, MaskGenerator, MaskOptions, PresenceMask};
pub use modality::{Modality, ModalityError, ModalityRegistry, SharedRegistry};
pub use types::{MissingRate, ReservationPolicy};
