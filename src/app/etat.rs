//! src/app/etat.rs
//!
//! État UI (sans vue, sans noyau).
//!
//! Rôle : contenir l’état de la calculatrice (entrée, x, résultat, erreur, démarche,
//! paramètres et points de la courbe) et offrir des opérations simples (C/CLR/AC)
//! sans logique d’affichage.
//!
//! Contrats :
//! - Aucune évaluation ici (pas de noyau, pas de parsing).
//! - Actions déterministes, sans effet de bord caché.
//! - Bornes sur le pas et le zoom du tracé.

/// Intervalle et pas du tracé au démarrage.
const DEBUT_DEFAUT: f32 = -10.0;
const FIN_DEFAUT: f32 = 10.0;
const PAS_DEFAUT: f32 = 0.1;

/// Pixels par unité.
const ZOOM_DEFAUT: f32 = 20.0;

/// Bornes du tracé.
pub const PAS_MIN: f32 = 0.001;
pub const ZOOM_MIN: f32 = 1.0;
pub const ZOOM_MAX: f32 = 500.0;

#[derive(Clone, Default, Debug)]
pub struct Demarche {
    pub jetons: String,
    pub rpn: String,
}

#[derive(Clone, Debug)]
pub struct AppCalc {
    // --- entrée utilisateur ---
    pub entree: String,
    pub x: f32,

    // --- sorties ---
    pub resultat: String, // décimal, point comme séparateur
    pub erreur: String,   // message d’erreur (si parsing/éval échoue)

    // --- démarche (panneau d’explication) ---
    pub demarche: Demarche,

    // --- tracé ---
    pub debut: f32,
    pub fin: f32,
    pub pas: f32,
    pub zoom: f32,
    /// Un point par échantillon ; None = point non tracé (erreur, NaN, ±inf).
    pub courbe: Vec<Option<[f32; 2]>>,
    pub erreur_courbe: String,

    // --- UX ---
    // Permet à vue.rs de redonner le focus à l’entrée après un clic sur un bouton.
    pub focus_entree: bool,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self {
            entree: String::new(),
            x: 0.0,
            resultat: String::new(),
            erreur: String::new(),
            demarche: Demarche::default(),
            debut: DEBUT_DEFAUT,
            fin: FIN_DEFAUT,
            pas: PAS_DEFAUT,
            zoom: ZOOM_DEFAUT,
            courbe: Vec::new(),
            erreur_courbe: String::new(),
            focus_entree: true, // au lancement, on veut pouvoir taper tout de suite
        }
    }
}

/// Rendu d’un résultat : point décimal quelle que soit la locale.
pub fn format_resultat(v: f32) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f32::INFINITY {
        "+inf".to_string()
    } else if v == f32::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{v}")
    }
}

impl AppCalc {
    /* ------------------------ Actions “boutons” (état seulement) ------------------------ */

    /// AC : remise à zéro totale (entrée + résultats + courbe + paramètres).
    pub fn reset_total(&mut self) {
        *self = Self::default();
    }

    /// C : effacer seulement l’entrée (sans toucher aux résultats).
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.focus_entree = true;
    }

    /// CLR : effacer résultat + erreur + démarche + courbe (sans toucher à l’entrée).
    pub fn clear_resultats(&mut self) {
        self.resultat.clear();
        self.erreur.clear();
        self.demarche = Demarche::default();
        self.courbe.clear();
        self.erreur_courbe.clear();
        self.focus_entree = true;
    }

    /// Utilitaire : placer une erreur.
    ///
    /// Choix UX :
    /// - On CONSERVE `resultat` (dernier résultat) pour ne pas “effacer l’écran” sur une faute.
    /// - On efface la démarche (non fiable si la compilation échoue).
    pub fn set_erreur(&mut self, msg: impl Into<String>) {
        self.erreur = msg.into();
        self.demarche = Demarche::default();
        self.focus_entree = true;
    }

    /// Utilitaire : déposer un résultat complet (valeur + démarche).
    pub fn set_resultat(&mut self, valeur: f32, demarche: Demarche) {
        self.erreur.clear();
        self.resultat = format_resultat(valeur);
        self.demarche = demarche;
        self.focus_entree = true;
    }

    /// Dépose les points d’une courbe ; (x, y) non fini => None.
    pub fn set_courbe(&mut self, points: impl IntoIterator<Item = (f32, Option<f32>)>) {
        self.erreur_courbe.clear();
        self.courbe = points
            .into_iter()
            .map(|(x, y)| y.filter(|y| y.is_finite()).map(|y| [x, y]))
            .collect();
    }

    pub fn set_erreur_courbe(&mut self, msg: impl Into<String>) {
        self.erreur_courbe = msg.into();
        self.courbe.clear();
    }

    /// Nombre de points effectivement traçables.
    pub fn points_traces(&self) -> usize {
        self.courbe.iter().flatten().count()
    }

    /// Garde-fou : pas >= PAS_MIN.
    pub fn set_pas(&mut self, pas: f32) {
        self.pas = if pas.is_finite() { pas.max(PAS_MIN) } else { PAS_DEFAUT };
    }

    /// Garde-fou : zoom dans [ZOOM_MIN, ZOOM_MAX].
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = if zoom.is_finite() {
            zoom.clamp(ZOOM_MIN, ZOOM_MAX)
        } else {
            ZOOM_DEFAUT
        };
    }
}
