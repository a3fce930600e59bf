//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - chaque expression générée est accompagnée de sa valeur de référence,
//!   calculée directement (mêmes formules, même ordre) : la RPN doit la retrouver
//! - seule erreur acceptée à l’évaluation : hors domaine (tg/ctg près de ±π/2)

use std::time::{Duration, Instant};

use super::erreur::ErrorKind;
use super::session::compile;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération (texte + référence) ------------------------ */

/// Valeur de référence : None si un tg/ctg tombe près d’un pôle.
type Ref = Option<f32>;

fn pole(v: f32) -> bool {
    let v = f64::from(v);
    (v - std::f64::consts::FRAC_PI_2).abs() < 1e-4 || (v + std::f64::consts::FRAC_PI_2).abs() < 1e-4
}

fn gen_nombre(rng: &mut Rng) -> (String, Ref) {
    let a = rng.pick(10);
    let s = if rng.coin() {
        // décimales exactes en binaire
        let d = match rng.pick(4) {
            0 => "5",
            1 => "25",
            2 => "125",
            _ => "75",
        };
        format!("{a}.{d}")
    } else {
        format!("{a}")
    };
    let v = s.parse::<f32>().unwrap();
    (s, Some(v))
}

fn gen_atom(rng: &mut Rng, x: f32) -> (String, Ref) {
    if rng.pick(3) == 0 {
        ("x".to_string(), Some(x))
    } else {
        gen_nombre(rng)
    }
}

fn binaire(sym: char, a: f32, b: f32) -> f32 {
    match sym {
        '+' => a + b,
        '-' => a - b,
        '*' => a * b,
        '/' => a / b,
        _ => f64::from(a).powf(f64::from(b)) as f32,
    }
}

fn gen_expr(rng: &mut Rng, depth: usize, x: f32) -> (String, Ref) {
    if depth == 0 {
        return gen_atom(rng, x);
    }

    match rng.pick(12) {
        0 => gen_atom(rng, x),
        k @ 1..=5 => {
            let sym = ['+', '-', '*', '/', '^'][(k - 1) as usize];
            let (sa, va) = gen_expr(rng, depth - 1, x);
            let (sb, vb) = gen_expr(rng, depth - 1, x);
            let v = va.zip(vb).map(|(a, b)| binaire(sym, a, b));
            (format!("({sa}{sym}{sb})"), v)
        }
        6 => {
            let (sa, va) = gen_expr(rng, depth - 1, x);
            (format!("(-{sa})"), va.map(|a| -a))
        }
        7 => {
            let (sa, va) = gen_expr(rng, depth - 1, x);
            (
                format!("sqrt({sa})"),
                va.map(|a| f64::from(a).sqrt() as f32),
            )
        }
        8 => {
            let (sa, va) = gen_expr(rng, depth - 1, x);
            let nom = if rng.coin() { "sin" } else { "cos" };
            let v = va.map(|a| {
                let a = f64::from(a);
                (if nom == "sin" { a.sin() } else { a.cos() }) as f32
            });
            (format!("{nom}({sa})"), v)
        }
        9 => {
            let (sa, va) = gen_expr(rng, depth - 1, x);
            let ctg = rng.coin();
            let v = va.and_then(|a| {
                if pole(a) {
                    None
                } else if ctg {
                    Some(1.0 / f64::from(a).tan() as f32)
                } else {
                    Some(f64::from(a).tan() as f32)
                }
            });
            (format!("{}({sa})", if ctg { "ctg" } else { "tg" }), v)
        }
        10 => {
            let (sa, va) = gen_expr(rng, depth - 1, x);
            let (sb, vb) = gen_expr(rng, depth - 1, x);
            let v = va
                .zip(vb)
                .map(|(a, b)| (f64::from(b).ln() / f64::from(a).ln()) as f32);
            (format!("log({sa}, {sb})"), v)
        }
        _ => {
            let (sa, va) = gen_expr(rng, depth - 1, x);
            let (sb, vb) = gen_expr(rng, depth - 1, x);
            let v = va
                .zip(vb)
                .map(|(a, b)| f64::from(b).powf(1.0 / f64::from(a)) as f32);
            (format!("rt({sa},{sb})"), v)
        }
    }
}

fn meme_valeur(a: f32, b: f32) -> bool {
    a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
}

/* ------------------------ Helper somme balancée ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_reference_et_determinisme() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // Même seed => mêmes expressions => mêmes sorties (déterminisme)
    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut seen_ok = 0usize;

    for _ in 0..300 {
        budget(t0, max);

        let x = (rng.pick(41) as f32 - 20.0) / 4.0;
        let (expr, reference) = gen_expr(&mut rng, 4, x);

        let c = compile(&expr).unwrap_or_else(|e| panic!("compile({expr:?}) erreur: {e}"));
        let r1 = c.evaluate_at(x);
        let r2 = c.evaluate_at(x);

        match (reference, r1, r2) {
            (Some(v), Ok(a), Ok(b)) => {
                assert!(meme_valeur(a, b), "non déterministe: expr={expr:?}");
                assert!(
                    meme_valeur(a, v),
                    "expr={expr:?} x={x} rpn={} obtenu={a} attendu={v}",
                    c.rpn_text()
                );
                seen_ok += 1;
            }
            (None, Err(e1), Err(e2)) => {
                assert_eq!(e1, e2);
                assert_eq!(e1.kind(), ErrorKind::Domain, "expr={expr:?}");
            }
            (reference, r1, _) => {
                panic!("expr={expr:?} x={x} référence={reference:?} obtenu={r1:?}")
            }
        }
    }

    // On veut surtout des succès, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 200, "trop peu de succès: {seen_ok}");
}

#[test]
fn fuzz_safe_bruit_sans_panique() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    // Texte aléatoire : toute erreur de compile est acceptable, une panique non.
    // Une fois compilée, seules des erreurs de pile ou de domaine sont possibles.
    const ALPHABET: &[char] = &[
        '1', '2', '.', ',', 'x', '+', '-', '*', '/', '^', '(', ')', ' ', 's', 'q', 'r', 't', 'l',
        'o', 'g', '#',
    ];
    let mut rng = Rng::new(0xBADC0DE_u64);

    for _ in 0..2000 {
        budget(t0, max);

        let len = 1 + rng.pick(12) as usize;
        let expr: String = (0..len)
            .map(|_| ALPHABET[rng.pick(ALPHABET.len() as u32) as usize])
            .collect();

        if let Ok(c) = compile(&expr) {
            if let Err(e) = c.evaluate_at(1.0) {
                assert!(
                    matches!(
                        e.kind(),
                        ErrorKind::EmptyExpression | ErrorKind::StackUnderflow | ErrorKind::Domain
                    ),
                    "expr={expr:?} err={e}"
                );
            }
        }
    }
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    let expr = somme_balancee("0.5", 800);
    budget(t0, max);

    let v = compile(&expr)
        .and_then(|c| c.evaluate_at(0.0))
        .unwrap_or_else(|e| panic!("err: {e}"));

    // 800*(1/2) = 400
    assert_eq!(v, 400.0);
}

#[test]
fn fuzz_safe_chaine_longue_et_profonde() {
    // Tout est itératif : ni longueur ni profondeur ne font déborder la pile d’appels.
    let somme = vec!["1"; 10_000].join("+");
    assert_eq!(compile(&somme).and_then(|c| c.evaluate_at(0.0)), Ok(10_000.0));

    let profond = format!("{}x{}", "(".repeat(5_000), ")".repeat(5_000));
    assert_eq!(compile(&profond).and_then(|c| c.evaluate_at(2.5)), Ok(2.5));

    let racines = format!("{}256{}", "sqrt(".repeat(3), ")".repeat(3));
    assert_eq!(compile(&racines).and_then(|c| c.evaluate_at(0.0)), Ok(2.0));
}
