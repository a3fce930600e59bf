//! Noyau — session d’expression (façade)
//!
//! texte -> jetons -> RPN (une seule fois, `compile`)
//!       -> évaluation pour chaque valeur de x (`evaluate_at`, autant de fois qu’on veut)
//!
//! Une `CompiledExpression` est immuable : on peut l’évaluer depuis plusieurs
//! threads à la fois (chaque appel a sa propre pile).

use super::erreur::{RpnError, RpnResult};
use super::eval::eval_rpn;
use super::jetons::{format_tokens, tokenize, Token};
use super::operateurs::OperatorRegistry;
use super::rpn::to_rpn;

/// Seule variable reconnue par `compile`.
pub const VARIABLE_PAR_DEFAUT: char = 'x';

/// Garde-fou : nombre maximal de points pour un échantillonnage.
pub const MAX_ECHANTILLONS: usize = 100_000;

const TOLERANCE_ARRONDI: f64 = 1e-6;

#[derive(Clone, Debug)]
pub struct CompiledExpression<'r> {
    text: String,
    tokens_text: String,
    rpn: Vec<Token<'r>>,
}

/// Un point de courbe : x et le résultat (ou l’erreur) de l’évaluation en x.
#[derive(Clone, Debug, PartialEq)]
pub struct Echantillon {
    pub x: f32,
    pub y: RpnResult<f32>,
}

/// Compile avec le registre global et la variable `x`.
pub fn compile(text: &str) -> RpnResult<CompiledExpression<'static>> {
    compile_with(text, OperatorRegistry::global(), &[VARIABLE_PAR_DEFAUT])
}

/// Compile avec un registre et des noms de variables fournis par l’appelant.
pub fn compile_with<'r>(
    text: &str,
    registre: &'r OperatorRegistry,
    variables: &[char],
) -> RpnResult<CompiledExpression<'r>> {
    let s = text.trim();
    if s.is_empty() {
        return Err(RpnError::EmptyExpression { values: 0 });
    }

    let tokens = tokenize(s, registre, variables)?;
    let rpn = to_rpn(&tokens)?;

    let compiled = CompiledExpression {
        text: s.to_string(),
        tokens_text: format_tokens(&tokens),
        rpn,
    };
    tracing::debug!(
        expression = %compiled.text,
        rpn = %compiled.rpn_text(),
        "expression compilée"
    );
    Ok(compiled)
}

impl<'r> CompiledExpression<'r> {
    pub fn evaluate_at(&self, x: f32) -> RpnResult<f32> {
        eval_rpn(&self.rpn, x)
    }

    /// Texte source (sans espaces de bord).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn rpn(&self) -> &[Token<'r>] {
        &self.rpn
    }

    /// Jetons d’entrée, séparés par des espaces (démarche).
    pub fn tokens_text(&self) -> &str {
        &self.tokens_text
    }

    /// RPN séparée par des espaces (démarche).
    pub fn rpn_text(&self) -> String {
        format_tokens(&self.rpn)
    }

    /// Évalue en x_i = start + i*step pour tous les x_i <= end.
    ///
    /// Un point en erreur (tg(π/2)...) garde son erreur sans arrêter la courbe.
    /// start > end => courbe vide.
    pub fn sample(&self, start: f32, end: f32, step: f32) -> RpnResult<Vec<Echantillon>> {
        if !start.is_finite() || !end.is_finite() {
            return Err(RpnError::invalid_range("bornes non finies"));
        }
        if !(step.is_finite() && step > 0.0) {
            return Err(RpnError::invalid_range("le pas doit être > 0"));
        }
        if start > end {
            return Ok(Vec::new());
        }

        // index -> x : pas de dérive par accumulation de `x += step`.
        // TOLERANCE_ARRONDI absorbe l’écart f32/f64 du pas (0.1f32 != 0.1).
        let span = (f64::from(end) - f64::from(start)) / f64::from(step);
        // compté en f64 : un intervalle immense ne doit pas déborder usize
        let compte = (span + TOLERANCE_ARRONDI).floor() + 1.0;
        if compte > MAX_ECHANTILLONS as f64 {
            return Err(RpnError::invalid_range(format!(
                "{compte:.0} points demandés (max {MAX_ECHANTILLONS})"
            )));
        }
        let n = compte as usize;

        let points: Vec<Echantillon> = (0..n)
            .map(|i| {
                let x = (f64::from(start) + i as f64 * f64::from(step)) as f32;
                Echantillon {
                    x,
                    y: self.evaluate_at(x),
                }
            })
            .collect();

        tracing::debug!(
            expression = %self.text,
            start,
            end,
            step,
            points = points.len(),
            "courbe échantillonnée"
        );
        Ok(points)
    }
}

/// Expression + valeur de variable liées ensemble.
#[derive(Clone, Debug)]
pub struct ExpressionSession {
    expression: CompiledExpression<'static>,
    variable: f32,
}

impl ExpressionSession {
    pub fn new(text: &str, variable: f32) -> RpnResult<Self> {
        Ok(Self {
            expression: compile(text)?,
            variable,
        })
    }

    pub fn evaluate(&self) -> RpnResult<f32> {
        self.expression.evaluate_at(self.variable)
    }

    pub fn set_variable(&mut self, variable: f32) {
        self.variable = variable;
    }

    pub fn variable(&self) -> f32 {
        self.variable
    }

    pub fn expression(&self) -> &CompiledExpression<'static> {
        &self.expression
    }
}
