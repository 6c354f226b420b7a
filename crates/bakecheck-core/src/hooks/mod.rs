//! Generation hooks
//!
//! - `pre_gen`: Parameter Set validation, runs before anything is rendered
//! - `post_gen`: secret generation and virtualenv setup inside the rendered project

pub mod post_gen;
pub mod pre_gen;

pub use post_gen::{create_virtualenv, fill_secrets, generate_secret, run_post_gen};
pub use pre_gen::{validate, PreGenCheck, PreGenHook, ValidationError};
