//! src/app/repere.rs
//!
//! Repère du tracé : conversions math <-> écran.
//!
//! - Origine mathématique au centre de la zone.
//! - `zoom` = pixels par unité, identique sur les deux axes.
//! - L’axe y de l’écran descend : y math positif => vers le haut.

use eframe::egui::{pos2, Pos2, Rect};

#[derive(Clone, Copy, Debug)]
pub struct Repere {
    zone: Rect,
    zoom: f32,
}

impl Repere {
    pub fn new(zone: Rect, zoom: f32) -> Self {
        Self { zone, zoom }
    }

    pub fn zone(&self) -> Rect {
        self.zone
    }

    pub fn origine(&self) -> Pos2 {
        self.zone.center()
    }

    pub fn vers_ecran(&self, x: f32, y: f32) -> Pos2 {
        let o = self.origine();
        pos2(o.x + x * self.zoom, o.y - y * self.zoom)
    }

    pub fn vers_math(&self, p: Pos2) -> (f32, f32) {
        let o = self.origine();
        ((p.x - o.x) / self.zoom, (o.y - p.y) / self.zoom)
    }

    /// Bornes mathématiques visibles sur l’axe x.
    pub fn x_visibles(&self) -> (f32, f32) {
        let (gauche, _) = self.vers_math(self.zone.left_top());
        let (droite, _) = self.vers_math(self.zone.right_bottom());
        (gauche, droite)
    }

    /// Point raisonnable à donner au painter (fini, pas à des kilomètres de la zone).
    pub fn tracable(&self, p: Pos2) -> bool {
        p.x.is_finite() && p.y.is_finite() && self.zone.expand(self.zone.height()).contains(p)
    }
}
