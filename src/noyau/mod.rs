//! Noyau RPN (f32)
//!
//! Organisation interne :
//! - erreur.rs     : taxonomie des erreurs (thiserror)
//! - operateurs.rs : registre des opérations (table statique, OnceLock)
//! - jetons.rs     : découpage en jetons
//! - rpn.rs        : shunting-yard -> RPN
//! - eval.rs       : évaluation de la RPN (pile de f32)
//! - session.rs    : compile une fois, évalue pour chaque x (+ échantillonnage)

pub mod erreur;
pub mod eval;
pub mod jetons;
pub mod operateurs;
pub mod rpn;
pub mod session;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use erreur::{ErrorKind, RpnError, RpnResult};
pub use jetons::Token;
pub use operateurs::{OperatorDescriptor, OperatorId, OperatorRegistry};
pub use session::{compile, compile_with, CompiledExpression, Echantillon, ExpressionSession};
