//! Noyau — évaluation d’une RPN
//!
//! Pile de f32 :
//! - Number   : empile sa valeur
//! - Variable : empile la valeur liée (une seule variable : toutes valent la même chose)
//! - Operator : dépile `arity` valeurs DANS L’ORDRE D’EMPILEMENT, applique, empile
//!
//! Remarque : l’ordre compte pour - / ^ log rt (non commutatifs).

use super::erreur::{RpnError, RpnResult};
use super::jetons::Token;

/// Évalue une RPN pour une valeur de variable donnée.
///
/// Erreurs :
/// - `StackUnderflow` : opérateur sans assez d’opérandes
/// - `EmptyExpression` : pile finale différente d’une seule valeur
/// - `Domain` : remontée telle quelle depuis l’opération (tg près de π/2...)
pub fn eval_rpn(rpn: &[Token<'_>], variable: f32) -> RpnResult<f32> {
    let mut st: Vec<f32> = Vec::with_capacity(rpn.len());

    for tok in rpn {
        match *tok {
            Token::Number(v) => st.push(v),
            Token::Variable(_) => st.push(variable),

            Token::Operator(op) => {
                if st.len() < op.arity {
                    return Err(RpnError::StackUnderflow {
                        operator: op.name().to_string(),
                        needed: op.arity,
                        available: st.len(),
                    });
                }
                let args = st.split_off(st.len() - op.arity);
                let v = op.apply(&args)?;
                st.push(v);
            }

            Token::OpenParen | Token::CloseParen | Token::Separator => {
                return Err(RpnError::MismatchedParentheses)
            }
        }
    }

    match st.as_slice() {
        [v] => Ok(*v),
        _ => Err(RpnError::EmptyExpression { values: st.len() }),
    }
}
