//! # Formwright: Form Schema Validation and Derived Fields
//!
//! Formwright is the engine behind a form builder. A schema is an ordered
//! list of typed fields; some fields are *derived*, computed from other
//! fields instead of entered by hand. The engine answers two questions for a
//! value map:
//!
//! - Is each value acceptable? See [`validator`].
//! - What should each derived field show? See [`eval::derive`].
//!
//! ## Formula Pipeline
//!
//! The `custom` derivation strategy evaluates a small arithmetic formula in
//! which `{Label}` placeholders stand for parent field values:
//!
//! ```text
//! Formula Text → Placeholder Substitution → Tokenizer → Analyzer → AST → Evaluator
//! ```
//!
//! - [`tokenizer`] splits the text into numbers, strings, operators and
//!   parentheses using `nom`.
//! - [`analyzer`] builds an [`ast::Expression`] with token-level parser
//!   combinators.
//! - [`eval`] evaluates the expression with script-style arithmetic. There
//!   is no environment to reach: a formula sees only its own literals.
//!
//! ## Around the Core
//!
//! - [`schema`]: data model, JSON layout and integrity checks
//! - [`builder`]: editor state (add, reorder, save, load)
//! - [`preview`]: a fill-in session that keeps derived values and errors current
//! - [`storage`]: async schema repositories (in memory, local JSON file)
//! - [`config`]: JSON configuration with per-field defaults
//!
//! ```
//! use formwright::{validate_field, FieldDef, FieldKind, FormValue, ValidationRule};
//!
//! let email = FieldDef::new(FieldKind::Text, "Email").with_rule(ValidationRule::email());
//! assert_eq!(
//!     validate_field(&email, &FormValue::from("a@b")),
//!     Some("Email must be a valid email address".to_string())
//! );
//! ```

pub mod analyzer;
pub mod ast;
pub mod builder;
pub mod calendar;
pub mod config;
pub mod error;
pub mod eval;
pub mod numeric;
pub mod preview;
pub mod schema;
pub mod storage;
pub mod timestamp;
pub mod tokenizer;
pub mod validator;

// Re-exports
pub use builder::{BuilderError, FormBuilder};
pub use config::FormwrightConfig;
pub use error::*;
pub use eval::{
    calculate_derived_value, calculate_derived_value_at, evaluate_formula, FormulaError, Value,
};
pub use preview::{FormPreview, PreviewError};
pub use schema::*;
pub use storage::{SchemaRepository, StorageError};
pub use validator::{check_field, validate_field, validate_form, ValidationError};
