// src/noyau/operateurs.rs
//
// Registre des opérations
// -----------------------
// Table statique : une ligne par opération (nom, priorité, fonction ?, arité, règle).
// Ajouter une opération = ajouter une ligne dans `OperatorRegistry::standard()`,
// sans toucher au découpage, à la conversion RPN ni à l’évaluation.
//
// Règles:
// - priorité 0 réservée à la parenthèse ouvrante (sentinelle du convertisseur)
// - arité >= 1
// - nom unique dans le registre
// - registre global : construit une fois (OnceLock), lecture seule ensuite

use std::collections::BTreeMap;
use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::sync::OnceLock;

use super::erreur::{RpnError, RpnResult};

/// Distance minimale (radians) à ±π/2 en dessous de laquelle tg/ctg refusent.
pub const TOLERANCE_POLE: f64 = 1e-4;

/// Identifiant d’une opération : son nom enregistré ("+", "sqrt", "log"...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OperatorId(pub &'static str);

impl OperatorId {
    pub fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Règle d’évaluation : reçoit exactement `arity` opérandes, dans l’ordre d’empilement.
pub type EvalFn = fn(&[f32]) -> RpnResult<f32>;

#[derive(Clone, Copy)]
pub struct OperatorDescriptor {
    pub id: OperatorId,
    pub precedence: u8,
    pub is_function: bool,
    pub arity: usize,
    pub evaluate: EvalFn,
}

impl OperatorDescriptor {
    /// Opérateur infixe binaire (`a OP b`).
    pub const fn infix(name: &'static str, precedence: u8, evaluate: EvalFn) -> Self {
        Self {
            id: OperatorId(name),
            precedence,
            is_function: false,
            arity: 2,
            evaluate,
        }
    }

    /// Fonction (`nom(a, b, ...)`).
    pub const fn function(
        name: &'static str,
        arity: usize,
        precedence: u8,
        evaluate: EvalFn,
    ) -> Self {
        Self {
            id: OperatorId(name),
            precedence,
            is_function: true,
            arity,
            evaluate,
        }
    }

    pub fn name(&self) -> &'static str {
        self.id.as_str()
    }

    pub fn apply(&self, operands: &[f32]) -> RpnResult<f32> {
        (self.evaluate)(operands)
    }
}

// Deux descripteurs sont égaux s’ils portent le même nom (le nom est unique).
impl PartialEq for OperatorDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for OperatorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorDescriptor")
            .field("id", &self.id)
            .field("precedence", &self.precedence)
            .field("is_function", &self.is_function)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, Default)]
pub struct OperatorRegistry {
    ops: BTreeMap<&'static str, OperatorDescriptor>,
}

impl OperatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute une opération. Refuse un nom déjà pris, la priorité 0 et l’arité 0.
    pub fn register(&mut self, descriptor: OperatorDescriptor) -> RpnResult<()> {
        let name = descriptor.name();

        if descriptor.precedence == 0 {
            return Err(RpnError::InvalidOperator {
                name: name.to_string(),
                reason: "priorité 0 réservée à la parenthèse".into(),
            });
        }
        if descriptor.arity == 0 {
            return Err(RpnError::InvalidOperator {
                name: name.to_string(),
                reason: "arité nulle".into(),
            });
        }
        if self.ops.contains_key(name) {
            return Err(RpnError::DuplicateOperator {
                name: name.to_string(),
            });
        }

        self.ops.insert(name, descriptor);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> RpnResult<&OperatorDescriptor> {
        self.ops.get(name).ok_or_else(|| RpnError::unknown(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ops.contains_key(name)
    }

    /// Parcours par ordre de nom (déterministe).
    pub fn iter(&self) -> impl Iterator<Item = &OperatorDescriptor> {
        self.ops.values()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Registre standard : + - * / ^, sqrt sin cos tg ctg, log rt, neg (moins unaire).
    pub fn standard() -> RpnResult<Self> {
        let mut r = Self::new();
        for d in TABLE_STANDARD {
            r.register(*d)?;
        }
        Ok(r)
    }

    /// Registre global, construit au premier usage.
    pub fn global() -> &'static OperatorRegistry {
        static GLOBAL: OnceLock<OperatorRegistry> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            let r = OperatorRegistry::standard().expect("table standard des opérations");
            tracing::debug!(operations = r.len(), "registre des opérations initialisé");
            r
        })
    }
}

/* ------------------------ Table standard ------------------------ */

const TABLE_STANDARD: &[OperatorDescriptor] = &[
    OperatorDescriptor::infix("+", 1, plus),
    OperatorDescriptor::infix("-", 1, moins),
    OperatorDescriptor::infix("*", 2, fois),
    OperatorDescriptor::infix("/", 2, divise),
    // Même priorité que les fonctions, liaison à gauche : 2^3^2 = (2^3)^2.
    OperatorDescriptor::infix("^", 3, puissance),
    OperatorDescriptor::function("neg", 1, 3, neg),
    OperatorDescriptor::function("sqrt", 1, 3, racine),
    OperatorDescriptor::function("sin", 1, 3, sinus),
    OperatorDescriptor::function("cos", 1, 3, cosinus),
    OperatorDescriptor::function("tg", 1, 3, tangente),
    OperatorDescriptor::function("ctg", 1, 3, cotangente),
    OperatorDescriptor::function("log", 2, 3, logarithme),
    OperatorDescriptor::function("rt", 2, 3, racine_n),
];

// + - * / restent en f32 ; le reste passe par f64 puis revient en f32.

fn plus(a: &[f32]) -> RpnResult<f32> {
    Ok(a[0] + a[1])
}

fn moins(a: &[f32]) -> RpnResult<f32> {
    Ok(a[0] - a[1])
}

fn fois(a: &[f32]) -> RpnResult<f32> {
    Ok(a[0] * a[1])
}

// Division par zéro : pas de piège, ±inf / NaN comme en flottant.
fn divise(a: &[f32]) -> RpnResult<f32> {
    Ok(a[0] / a[1])
}

fn puissance(a: &[f32]) -> RpnResult<f32> {
    Ok(f64::from(a[0]).powf(f64::from(a[1])) as f32)
}

fn neg(a: &[f32]) -> RpnResult<f32> {
    Ok(-a[0])
}

fn racine(a: &[f32]) -> RpnResult<f32> {
    Ok(f64::from(a[0]).sqrt() as f32)
}

fn sinus(a: &[f32]) -> RpnResult<f32> {
    Ok(f64::from(a[0]).sin() as f32)
}

fn cosinus(a: &[f32]) -> RpnResult<f32> {
    Ok(f64::from(a[0]).cos() as f32)
}

fn pres_de_pole(v: f32) -> bool {
    let v = f64::from(v);
    (v - FRAC_PI_2).abs() < TOLERANCE_POLE || (v + FRAC_PI_2).abs() < TOLERANCE_POLE
}

fn tangente(a: &[f32]) -> RpnResult<f32> {
    if pres_de_pole(a[0]) {
        return Err(RpnError::domain("tg n’est pas définie en ±π/2"));
    }
    Ok(f64::from(a[0]).tan() as f32)
}

// Même garde que tg (±π/2) ; ctg(0) reste +inf.
fn cotangente(a: &[f32]) -> RpnResult<f32> {
    if pres_de_pole(a[0]) {
        return Err(RpnError::domain("ctg n’est pas définie en ±π/2"));
    }
    Ok(1.0 / f64::from(a[0]).tan() as f32)
}

/// log(base, x)
fn logarithme(a: &[f32]) -> RpnResult<f32> {
    Ok((f64::from(a[1]).ln() / f64::from(a[0]).ln()) as f32)
}

/// rt(n, x) = x^(1/n)
fn racine_n(a: &[f32]) -> RpnResult<f32> {
    Ok(f64::from(a[1]).powf(1.0 / f64::from(a[0])) as f32)
}
