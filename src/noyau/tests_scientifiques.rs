//! Tests scientifiques (campagne) : invariants + robustesse + limites contrôlées.
//!
//! But : vérifier les propriétés du moteur sans faire chauffer la machine.
//! - budget temps global
//! - tailles bornées
//! - comparaisons f32 avec tolérance quand le calcul passe par sin/cos/log
//!
//! Notes importantes (aligné avec l’état actuel du noyau) :
//! - Priorité égale => liaison à gauche, '^' compris : 2^3^2 = (2^3)^2 = 64.
//! - Les fonctions passent avant tout opérateur voisin : 2+sqrt(9) = 5.
//! - Division par zéro : pas d’erreur, ±inf / NaN comme en flottant.
//! - tg / ctg : erreur de domaine à moins de 1e-4 de ±π/2 (ctg comprise).

use std::f32::consts::PI;
use std::time::{Duration, Instant};

use super::erreur::{ErrorKind, RpnError};
use super::session::compile;

fn eval_ok(expr: &str, x: f32) -> f32 {
    compile(expr)
        .and_then(|c| c.evaluate_at(x))
        .unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

fn eval_err(expr: &str, x: f32) -> RpnError {
    match compile(expr) {
        Ok(c) => match c.evaluate_at(x) {
            Ok(v) => panic!("expr={expr:?} : erreur attendue, obtenu {v}"),
            Err(e) => e,
        },
        Err(e) => e,
    }
}

fn assert_proche(expr: &str, x: f32, attendu: f32) {
    let v = eval_ok(expr, x);
    assert!(
        (v - attendu).abs() <= 1e-5 * attendu.abs().max(1.0),
        "expr={expr:?} x={x} obtenu={v} attendu={attendu}"
    );
}

/// Budget global anti-gel (scientifique + safe).
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Priorités et associativité ------------------------ */

#[test]
fn sci_priorites() {
    assert_eq!(eval_ok("2+3*4", 0.0), 14.0);
    assert_eq!(eval_ok("(2+3)*4", 0.0), 20.0);
    assert_eq!(eval_ok("2*3^2", 0.0), 18.0);
    assert_eq!(eval_ok("18/3^2", 0.0), 2.0);
    assert_eq!(eval_ok("1+2*3-4/2", 0.0), 5.0);
}

#[test]
fn sci_liaison_a_gauche() {
    assert_eq!(eval_ok("2-3-4", 0.0), -5.0);
    assert_eq!(eval_ok("64/4/2", 0.0), 8.0);
    // pas d’associativité à droite pour '^'
    assert_eq!(eval_ok("2^3^2", 0.0), 64.0);
    assert_eq!(eval_ok("2^(3^2)", 0.0), 512.0);
}

#[test]
fn sci_fonctions_prioritaires() {
    assert_eq!(eval_ok("2+sqrt(9)", 0.0), 5.0);
    assert_eq!(eval_ok("sqrt(9)*sqrt(4)", 0.0), 6.0);
    assert_eq!(eval_ok("sqrt(16)^2", 0.0), 16.0);
    assert_eq!(eval_ok("10-sqrt(x)", 49.0), 3.0);
}

/* ------------------------ Ordre des arguments ------------------------ */

#[test]
fn sci_ordre_des_arguments() {
    assert_eq!(eval_ok("log(2,8)", 0.0), 3.0);
    assert_eq!(eval_ok("log(10, 1000)", 0.0), 3.0);
    assert_eq!(eval_ok("rt(3,8)", 0.0), 2.0);
    assert_eq!(eval_ok("rt(2, x)", 81.0), 9.0);
    assert_eq!(eval_ok("x-1", 10.0), 9.0);
    assert_eq!(eval_ok("1/x", 4.0), 0.25);
}

/* ------------------------ Variable ------------------------ */

#[test]
fn sci_variable_reutilisee() {
    let c = compile("x*2+1").unwrap();
    assert_eq!(c.evaluate_at(3.0), Ok(7.0));
    assert_eq!(c.evaluate_at(5.0), Ok(11.0));

    // toutes les occurrences de x valent la même chose
    let c = compile("x*x + x").unwrap();
    for k in -5..=5 {
        let x = k as f32;
        assert_eq!(c.evaluate_at(x), Ok(x * x + x));
    }
}

/* ------------------------ Identités numériques ------------------------ */

#[test]
fn sci_identites_trig() {
    let c = compile("sin(x)^2 + cos(x)^2").unwrap();
    for p in c.sample(-PI, PI, 0.25).unwrap() {
        let v = p.y.unwrap();
        assert!((v - 1.0).abs() < 1e-5, "x={} v={v}", p.x);
    }

    assert_proche("sin(x)", PI / 6.0, 0.5);
    assert_proche("cos(x)", PI / 3.0, 0.5);
    assert_proche("tg(x)", PI / 4.0, 1.0);
    assert_proche("ctg(x)", PI / 4.0, 1.0);
    assert_proche("tg(x)*ctg(x)", 0.4, 1.0);
}

#[test]
fn sci_inverses() {
    for x in [0.5_f32, 2.0, 3.0, 10.0] {
        assert_proche("rt(3, x^3)", x, x);
        assert_proche("log(x, x^4)", x, 4.0);
        assert_proche("sqrt(x)^2", x, x);
    }
}

/* ------------------------ Domaine ------------------------ */

#[test]
fn sci_poles_tg_ctg() {
    assert_eq!(eval_err("tg(x)", 1.5708).kind(), ErrorKind::Domain);
    assert_eq!(eval_err("tg(x)", -1.5708).kind(), ErrorKind::Domain);
    assert_eq!(eval_err("ctg(x)", PI / 2.0).kind(), ErrorKind::Domain);
    assert_eq!(eval_err("1 + tg(x)", PI / 2.0).kind(), ErrorKind::Domain);

    // juste hors tolérance : valeur finie
    assert!(eval_ok("tg(x)", 1.5706).is_finite());
}

#[test]
fn sci_division_par_zero_flottante() {
    assert_eq!(eval_ok("1/0", 0.0), f32::INFINITY);
    assert_eq!(eval_ok("-1/x", 0.0), f32::NEG_INFINITY);
    assert!(eval_ok("0/0", 0.0).is_nan());
    assert!(eval_ok("sqrt(-1)", 0.0).is_nan());
}

/* ------------------------ Erreurs de syntaxe ------------------------ */

#[test]
fn sci_erreurs() {
    assert_eq!(eval_err("(2+3", 0.0), RpnError::MismatchedParentheses);
    assert_eq!(eval_err("2+3)", 0.0), RpnError::MismatchedParentheses);
    assert_eq!(eval_err("2#3", 0.0), RpnError::unknown("#"));
    assert_eq!(eval_err("tan(x)", 0.0), RpnError::unknown("tan"));
    assert_eq!(eval_err("2..5", 0.0).kind(), ErrorKind::MalformedNumber);
    assert_eq!(eval_err("*2", 0.0).kind(), ErrorKind::StackUnderflow);
    assert_eq!(eval_err("", 0.0).kind(), ErrorKind::EmptyExpression);
    assert_eq!(eval_err("log(8)", 0.0).kind(), ErrorKind::ArityMismatch);
}

/* ------------------------ Courbe ------------------------ */

#[test]
fn sci_courbe_periodique() {
    let c = compile("sin(x)").unwrap();
    for p in c.sample(0.0, 2.0, 0.25).unwrap() {
        let yp = p.y.unwrap();
        let yq = c.evaluate_at(p.x + 2.0 * PI).unwrap();
        assert!((yp - yq).abs() < 1e-5, "x={} : {yp} != {yq}", p.x);
    }
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn sci_stress_courbe_dense() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let c = compile("sin(x)*x^2 - log(2, x^2 + 1) + rt(3, x)").unwrap();
    let pts = c.sample(-50.0, 50.0, 0.01).unwrap();
    budget(t0, max);

    assert_eq!(pts.len(), 10_001);
    assert!(pts.iter().all(|p| p.y.is_ok()));
}

#[test]
fn sci_stress_compile_repete() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    for k in 0..2_000 {
        let expr = format!("({k}+x)*2 - sqrt({k})");
        let v = eval_ok(&expr, 1.0);
        assert!(v.is_finite());
        budget(t0, max);
    }
}
