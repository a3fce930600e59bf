// src/noyau/rpn.rs
//
// Shunting-yard -> RPN
// Objectif:
// - Convertir une suite de Token (infixe) en RPN (postfixe)
// - Le registre fournit priorité / arité / fonction ou opérateur
//
// Règles:
// - Number / Variable : sortie directe
// - fonction : empilée telle quelle, sortie dès que la ')' de son appel est lue
// - opérateur infixe : dépile tant que le sommet est une fonction, ou un opérateur
//   de priorité >= (liaison à gauche à priorité égale, '^' compris : 2^3^2 = 64)
// - ',' : dépile jusqu’à la '(' de l’appel, compte un argument
// - ')' : dépile jusqu’à '(' ; pile vide avant => parenthèses non équilibrées
// - fin : tout dépiler ; une '(' restante => parenthèses non équilibrées
//
// NOTE:
// - Les fonctions passent avant tout opérateur voisin : 2+sqrt(9) => 2 9 sqrt +
// - L’arité d’un appel est vérifiée ici (log(2) / sqrt(1,2) refusés).

use super::erreur::{RpnError, RpnResult};
use super::jetons::{est_appel, Token};
use super::operateurs::OperatorDescriptor;

/// Une parenthèse ouverte : éventuellement l’appel d’une fonction.
struct Groupe<'r> {
    fonction: Option<&'r OperatorDescriptor>,
    separateurs: usize,
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [2, +, sqrt, (, 9, )]
///   rpn:    [2, 9, sqrt, +]
pub fn to_rpn<'r>(tokens: &[Token<'r>]) -> RpnResult<Vec<Token<'r>>> {
    let mut out: Vec<Token<'r>> = Vec::with_capacity(tokens.len());
    let mut ops: Vec<Token<'r>> = Vec::new();
    let mut groupes: Vec<Groupe<'r>> = Vec::new();

    // “valeur” = un atome ou une expression fermée.
    // Sert à compter les arguments d’un appel.
    let mut prev_was_value = false;

    for (i, tok) in tokens.iter().copied().enumerate() {
        match tok {
            Token::Number(_) | Token::Variable(_) => {
                out.push(tok);
                prev_was_value = true;
            }

            Token::Operator(op) if op.is_function => {
                ops.push(tok);
                prev_was_value = false;
            }

            Token::Operator(op) => {
                while let Some(Token::Operator(top)) = ops.last() {
                    if !(top.is_function || top.precedence >= op.precedence) {
                        break;
                    }
                    if let Some(top) = ops.pop() {
                        out.push(top);
                    }
                }
                ops.push(tok);
                prev_was_value = false;
            }

            Token::OpenParen => {
                let fonction = match (i.checked_sub(1).map(|j| tokens[j]), ops.last()) {
                    (Some(Token::Operator(f)), Some(Token::Operator(top)))
                        if est_appel(f) && top == &f =>
                    {
                        Some(f)
                    }
                    _ => None,
                };
                groupes.push(Groupe {
                    fonction,
                    separateurs: 0,
                });
                ops.push(tok);
                prev_was_value = false;
            }

            Token::Separator => {
                let appel = matches!(groupes.last(), Some(g) if g.fonction.is_some());
                if !appel || !prev_was_value {
                    return Err(RpnError::MisplacedSeparator);
                }
                depile_jusqu_a_parenthese(&mut ops, &mut out)?;
                if let Some(g) = groupes.last_mut() {
                    g.separateurs += 1;
                }
                prev_was_value = false;
            }

            Token::CloseParen => {
                depile_jusqu_a_parenthese(&mut ops, &mut out)?;
                ops.pop(); // la '('

                let groupe = groupes.pop().ok_or(RpnError::MismatchedParentheses)?;
                if let Some(f) = groupe.fonction {
                    let found = if prev_was_value {
                        groupe.separateurs + 1
                    } else if groupe.separateurs > 0 {
                        // "log(2,)" : argument vide après la virgule
                        return Err(RpnError::MisplacedSeparator);
                    } else {
                        0
                    };
                    if found != f.arity {
                        return Err(RpnError::ArityMismatch {
                            function: f.name().to_string(),
                            expected: f.arity,
                            found,
                        });
                    }
                    // la fonction est au sommet (vérifié à l’ouverture)
                    if let Some(top) = ops.pop() {
                        out.push(top);
                    }
                }

                prev_was_value = true;
            }
        }
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if matches!(op, Token::OpenParen) {
            return Err(RpnError::MismatchedParentheses);
        }
        out.push(op);
    }

    Ok(out)
}

/// Dépile les opérateurs vers la sortie jusqu’à la '(' (laissée sur la pile).
fn depile_jusqu_a_parenthese<'r>(
    ops: &mut Vec<Token<'r>>,
    out: &mut Vec<Token<'r>>,
) -> RpnResult<()> {
    loop {
        match ops.last() {
            None => return Err(RpnError::MismatchedParentheses),
            Some(Token::OpenParen) => return Ok(()),
            Some(_) => {
                if let Some(top) = ops.pop() {
                    out.push(top);
                }
            }
        }
    }
}
