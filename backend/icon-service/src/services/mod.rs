pub mod icons;

pub use icons::IconPipeline;
