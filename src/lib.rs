//! Calculatrice RPN — noyau
//!
//! Expression infixe (priorités, parenthèses, fonctions, variable `x`)
//! -> jetons -> RPN -> valeur f32.
//!
//! ```
//! use calculatrice_rpn::noyau::compile;
//!
//! let c = compile("x*2+1").unwrap();
//! assert_eq!(c.evaluate_at(3.0), Ok(7.0));
//! assert_eq!(c.evaluate_at(5.0), Ok(11.0));
//! ```

pub mod noyau;
