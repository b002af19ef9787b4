pub mod config;
pub mod engine;
pub mod runtime;
pub mod segments;
pub mod template;
pub mod terminal;
pub mod themes;
pub mod utils;

pub use config::{
    load_config, Alignment, Block, BlockType, Config, CycleColors, ExtraPrompt, Overflow, SegmentConfig,
};
pub use engine::{patch_terminal_width, Engine, ExtraPromptKind, SegmentStyle};
pub use runtime::{Environment, Flags, MockEnvironment, Terminal};
pub use segments::{Properties, Registry, SegmentWriter};
pub use terminal::{ColorSpec, Shell};
