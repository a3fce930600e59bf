// src/noyau/jetons.rs
//
// Découpage en jetons
// -------------------
// Balayage gauche -> droite avec deux tampons :
// - tampon numérique : chiffres + séparateur décimal ('.' ou ',' normalisé en '.')
// - tampon identifiant : lettres (sqrt, log, x...)
// Un délimiteur (opérateur, parenthèse, espace, fin) vide les tampons.
//
// La virgule est ambiguë : dans l’appel d’une fonction, log(2,8), elle sépare les
// arguments ; partout ailleurs c’est un séparateur décimal (2,5 == 2.5).
//
// Le '-' sans valeur à sa gauche (début, après '(' / ',' / opérateur) devient `neg`.

use std::fmt;

use super::erreur::{RpnError, RpnResult};
use super::operateurs::{OperatorDescriptor, OperatorRegistry};

/// Nom de l’opération qui porte le moins unaire.
///
/// `neg` a la priorité des fonctions : il s’applique avant tout opérateur
/// infixe qui suit, `^` compris. Ainsi -x^2 vaut (-x)^2 (9 pour x = 3) ;
/// écrire -(x^2) pour l’opposé du carré.
///
/// Une '(' qui suit `neg` n’ouvre pas un appel : -(1,5) reste un groupe,
/// la virgule y est décimale.
pub(crate) const MOINS_UNAIRE: &str = "neg";

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Token<'r> {
    Number(f32),
    Variable(char),
    Operator(&'r OperatorDescriptor),
    OpenParen,
    CloseParen,
    /// Virgule entre deux arguments d’un appel de fonction.
    Separator,
}

impl Token<'_> {
    /// Vrai si le jeton termine une valeur (nombre, variable, groupe fermé).
    fn termine_valeur(&self) -> bool {
        matches!(self, Token::Number(_) | Token::Variable(_) | Token::CloseParen)
    }
}

/// Vrai si une '(' qui suit `op` ouvre l’appel de cette fonction.
pub(crate) fn est_appel(op: &OperatorDescriptor) -> bool {
    op.is_function && op.name() != MOINS_UNAIRE
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // f32 Display : point décimal, indépendant de la locale
            Token::Number(v) => write!(f, "{v}"),
            Token::Variable(c) => write!(f, "{c}"),
            Token::Operator(op) => f.write_str(op.name()),
            Token::OpenParen => f.write_str("("),
            Token::CloseParen => f.write_str(")"),
            Token::Separator => f.write_str(","),
        }
    }
}

/// État du balayage : sortie + tampons + pile des parenthèses ouvertes
/// (true = parenthèse d’appel de fonction).
struct Lecteur<'r, 'v> {
    registre: &'r OperatorRegistry,
    variables: &'v [char],
    out: Vec<Token<'r>>,
    nombre: String,
    ident: String,
    appels: Vec<bool>,
}

impl<'r> Lecteur<'r, '_> {
    fn vider_nombre(&mut self) -> RpnResult<()> {
        if self.nombre.is_empty() {
            return Ok(());
        }
        let v = self
            .nombre
            .parse::<f32>()
            .map_err(|_| RpnError::MalformedNumber {
                literal: self.nombre.clone(),
            })?;
        self.out.push(Token::Number(v));
        self.nombre.clear();
        Ok(())
    }

    fn vider_ident(&mut self) -> RpnResult<()> {
        if self.ident.is_empty() {
            return Ok(());
        }
        let w = self.ident.to_lowercase();
        self.ident.clear();

        let mut cs = w.chars();
        if let (Some(c), None) = (cs.next(), cs.next()) {
            if self.variables.contains(&c) {
                self.out.push(Token::Variable(c));
                return Ok(());
            }
        }

        let registre = self.registre;
        let op = registre.lookup(&w)?;
        self.out.push(Token::Operator(op));
        Ok(())
    }

    fn vider(&mut self) -> RpnResult<()> {
        self.vider_nombre()?;
        self.vider_ident()
    }

    fn dans_un_appel(&self) -> bool {
        self.appels.last().copied().unwrap_or(false)
    }

    fn precede_par_valeur(&self) -> bool {
        self.out.last().is_some_and(Token::termine_valeur)
    }

    fn operateur(&mut self, c: char) -> RpnResult<()> {
        let nom = if c == '-' && !self.precede_par_valeur() {
            MOINS_UNAIRE.to_string()
        } else {
            c.to_string()
        };
        let registre = self.registre;
        let op = registre.lookup(&nom)?;
        self.out.push(Token::Operator(op));
        Ok(())
    }
}

/// Découpe une expression en jetons.
///
/// Erreurs :
/// - `MalformedNumber` si un littéral ne se lit pas en f32 ("1.2.3", ".")
/// - `UnknownOperator` si un symbole / identifiant n’est ni une opération ni une variable
pub fn tokenize<'r>(
    expression: &str,
    registre: &'r OperatorRegistry,
    variables: &[char],
) -> RpnResult<Vec<Token<'r>>> {
    let mut lx = Lecteur {
        registre,
        variables,
        out: Vec::new(),
        nombre: String::new(),
        ident: String::new(),
        appels: Vec::new(),
    };

    for c in expression.chars() {
        if c.is_whitespace() {
            lx.vider()?;
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            lx.vider_ident()?;
            lx.nombre.push(c);
            continue;
        }

        if c == ',' {
            if lx.dans_un_appel() {
                lx.vider()?;
                lx.out.push(Token::Separator);
            } else {
                lx.vider_ident()?;
                lx.nombre.push('.');
            }
            continue;
        }

        if c.is_alphabetic() {
            lx.vider_nombre()?;
            lx.ident.push(c);
            continue;
        }

        // Délimiteur : on vide d’abord les tampons.
        lx.vider()?;

        match c {
            '(' => {
                let appel = matches!(lx.out.last(), Some(Token::Operator(op)) if est_appel(op));
                lx.appels.push(appel);
                lx.out.push(Token::OpenParen);
            }
            ')' => {
                // Le déséquilibre est signalé par la conversion RPN.
                lx.appels.pop();
                lx.out.push(Token::CloseParen);
            }
            _ => lx.operateur(c)?,
        }
    }

    lx.vider()?;
    Ok(lx.out)
}

/// Format utilitaire (démarche) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Token<'_>]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
