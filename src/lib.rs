#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod codec;
pub mod command;
pub mod config;
pub mod editor;
pub mod element;
pub mod error;
pub mod file_handler;
pub mod fry;
pub mod geometry;
pub mod id_generator;
pub mod input;
pub mod interaction;
pub mod panels;
pub mod renderer;
pub mod scene;
pub mod text;
pub mod util;

pub use app::{FryApp, FrySettings};
pub use canvas::Canvas;
pub use command::Command;
pub use config::FryConfig;
pub use editor::Editor;
pub use element::{Bitmap, Element, ElementKind};
pub use error::{FryError, Result};
pub use file_handler::{DropMode, FileHandler};
pub use fry::{FryPass, FryScheduler, PassStatus};
pub use id_generator::ElementId;
pub use input::{InputEvent, InputHandler, PointerInput};
pub use interaction::{CursorHint, Interaction, InteractionState};
pub use renderer::Renderer;
pub use scene::Scene;
