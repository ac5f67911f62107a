pub mod archive;
pub mod config;
pub mod converter;
pub mod notifier;
pub mod organizer;
pub mod processor;
pub mod profile;
pub mod testing;

pub use archive::{ArchiveError, Extraction, Extractor, ExtractorConfig};
pub use config::{
    default_config_path, load_config, load_config_from_str, load_config_or_default,
    validate_config, Config, ConfigError, SanitizedConfig,
};
pub use converter::{
    ConversionResult, ConverterConfig, ConverterError, Engine, FfmpegEngine, Orchestrator,
    ProgressSample,
};
pub use notifier::{Notifier, NotifyError, TelegramNotifier};
pub use organizer::{organize_series, OrganizerError, SeriesReport};
pub use processor::{ConversionProcessor, ProcessorConfig, ProcessorError, RequestOutcome};
pub use profile::{ConversionProfile, ProfileResolver};
