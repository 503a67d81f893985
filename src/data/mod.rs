//! Data layer: discovery, loading, normalization and grouping.
//!
//! Architecture:
//! ```text
//!  Land_Src_1_Basin.csv, River_Src_2_Bow.csv, ...
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ catalog  │  file name → ParameterSetFile
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader  │  wide CSV → Vec<RawRecord>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ normalize │  policy rules → Corpus of ObservationRecord
//!   └───────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter  │  per-parameter subsets grouped by class or basin
//!   └──────────┘
//! ```

pub mod catalog;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod policy;
