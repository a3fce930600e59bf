// src/app/vue.rs
//
// Vue (UI egui)
// -------------
// Objectifs :
// - Clavier : Enter évalue (quand le champ est focus), DEL retire une fonction entière
// - Boutons : pavé, opérations, fonctions du registre standard
// - Démarche : jetons + RPN de la dernière évaluation
// - Courbe : échantillonnage [début ; fin] par pas, tracé dans un painter
//
// Note :
// - Aucune logique de calcul ici : tout passe par calculatrice_rpn::noyau.

use calculatrice_rpn::noyau;
use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Stroke};

use super::etat::{AppCalc, Demarche, PAS_MIN, ZOOM_MAX, ZOOM_MIN};
use super::repere::Repere;

const HAUTEUR_TRACE: f32 = 360.0;
const TAILLE_FLECHE: f32 = 10.0;
const DEMI_GRADUATION: f32 = 4.0;

/// En dessous, les graduations se touchent : on ne les dessine pas.
const ECART_GRADUATION_MIN: f32 = 3.0;

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        // Densité “calc”
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Calculatrice RPN");
                ui.add_space(6.0);

                self.ui_entree(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_resultat(ui);
                self.ui_demarche(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_courbe(ui);
            });
    }

    fn ui_entree(&mut self, ui: &mut egui::Ui) {
        ui.label("Expression :");

        // id stable + focus contrôlé
        let resp = ui.add(
            egui::TextEdit::singleline(&mut self.entree)
                .desired_width(ui.available_width())
                .hint_text("Ex: x*2+1, log(2, 8), rt(3, x), 2,5*x")
                .id_salt("entree_edit")
                .code_editor(),
        );

        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if resp.has_focus() && enter {
            self.eval_via_noyau();
        }

        ui.add_space(6.0);

        ui.horizontal(|ui| {
            // C = entrée seulement ; CLR = résultats seulement ; AC = tout
            self.bouton_action(ui, "C", "Efface seulement l’entrée", Action::ClearEntree);
            self.bouton_action(
                ui,
                "CLR",
                "Efface résultat + erreur + démarche + courbe",
                Action::ClearResultats,
            );
            self.bouton_action(ui, "AC", "Remise à zéro totale", Action::ResetTotal);

            ui.separator();

            ui.add(egui::DragValue::new(&mut self.x).speed(0.1).prefix("x = "));
        });

        ui.add_space(8.0);

        ui.horizontal_wrapped(|ui| {
            self.bouton_insert(ui, "(", "(", InsertKind::OpenParen);
            self.bouton_insert(ui, ")", ")", InsertKind::CloseParen);
            self.bouton_insert(ui, ",", ",", InsertKind::Separateur);

            self.bouton_insert(ui, "+", "+", InsertKind::Op);
            self.bouton_insert(ui, "-", "-", InsertKind::Op);
            self.bouton_insert(ui, "*", "*", InsertKind::Op);
            self.bouton_insert(ui, "/", "/", InsertKind::Op);
            self.bouton_insert(ui, "^", "^", InsertKind::Op);

            ui.separator();

            self.bouton_insert(ui, "sqrt", "sqrt(", InsertKind::Func);
            self.bouton_insert(ui, "sin", "sin(", InsertKind::Func);
            self.bouton_insert(ui, "cos", "cos(", InsertKind::Func);
            self.bouton_insert(ui, "tg", "tg(", InsertKind::Func);
            self.bouton_insert(ui, "ctg", "ctg(", InsertKind::Func);
            self.bouton_insert(ui, "log", "log(", InsertKind::Func);
            self.bouton_insert(ui, "rt", "rt(", InsertKind::Func);

            ui.separator();

            self.bouton_insert(ui, "x", "x", InsertKind::Word);

            ui.add_space(10.0);

            let eq = ui.add_sized([64.0, 32.0], egui::Button::new("="));
            if eq.clicked() {
                self.eval_via_noyau();
            }
        });

        ui.add_space(8.0);

        self.ui_pave_numerique(ui);

        if !self.erreur.is_empty() {
            ui.add_space(6.0);
            ui.colored_label(ui.visuals().error_fg_color, &self.erreur);
        }
    }

    fn ui_pave_numerique(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_numerique_rpn")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for ligne in [["7", "8", "9"], ["4", "5", "6"], ["1", "2", "3"]] {
                    for chiffre in ligne {
                        self.bouton_insert(ui, chiffre, chiffre, InsertKind::Digit);
                    }
                    match ligne[0] {
                        "7" => self.bouton_action(
                            ui,
                            "DEL",
                            "Efface le dernier symbole",
                            Action::Backspace,
                        ),
                        "4" => self.bouton_insert(ui, ".", ".", InsertKind::Digit),
                        _ => {
                            ui.label("");
                        }
                    }
                    ui.end_row();
                }

                self.bouton_insert(ui, "0", "0", InsertKind::Digit);
                ui.end_row();
            });
    }

    /// Backspace “intelligent” : retire d’un coup un nom de fonction suivi de "(".
    fn backspace_entree(&mut self) {
        while self.entree.ends_with(' ') {
            self.entree.pop();
        }

        // "ctg(" avant "tg(" : l’un est suffixe de l’autre
        let motif = ["sqrt(", "sin(", "cos(", "ctg(", "tg(", "log(", "rt("]
            .into_iter()
            .find(|m| self.entree.ends_with(m));

        match motif {
            Some(m) => self.entree.truncate(self.entree.len() - m.len()),
            None => {
                self.entree.pop();
            }
        }

        while self.entree.ends_with(' ') {
            self.entree.pop();
        }
    }

    fn ui_resultat(&mut self, ui: &mut egui::Ui) {
        ui.label(format!("Résultat (x = {}) :", self.x));
        Self::champ_monospace(ui, "resultat_out", &self.resultat, 1);
    }

    fn ui_demarche(&mut self, ui: &mut egui::Ui) {
        ui.add_space(6.0);
        egui::CollapsingHeader::new("Démarche")
            .default_open(true)
            .show(ui, |ui| {
                Self::champ_demarche(ui, "Jetons", "demarche_jetons", &self.demarche.jetons);
                Self::champ_demarche(ui, "RPN", "demarche_rpn", &self.demarche.rpn);
            });
    }

    fn champ_demarche(ui: &mut egui::Ui, titre: &str, id: &str, contenu: &str) {
        ui.add_space(4.0);
        ui.label(format!("{titre} :"));
        Self::champ_monospace(ui, id, contenu, 2);
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str, rows: usize) {
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(
                        rows as f32 * ui.text_style_height(&egui::TextStyle::Monospace),
                    );
                    ui.monospace(contenu);
                });
            });
    }

    /* ------------------------ Courbe ------------------------ */

    fn ui_courbe(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            ui.label("Début :");
            ui.add(egui::DragValue::new(&mut self.debut).speed(0.1));
            ui.label("Fin :");
            ui.add(egui::DragValue::new(&mut self.fin).speed(0.1));

            ui.label("Pas :");
            let mut pas = self.pas;
            let resp = ui.add(
                egui::DragValue::new(&mut pas)
                    .speed(0.01)
                    .range(PAS_MIN..=100.0),
            );
            if resp.changed() {
                self.set_pas(pas);
            }

            ui.label("Zoom :");
            let mut zoom = self.zoom;
            let resp = ui.add(
                egui::DragValue::new(&mut zoom)
                    .speed(0.5)
                    .range(ZOOM_MIN..=ZOOM_MAX)
                    .suffix(" px"),
            );
            if resp.changed() {
                self.set_zoom(zoom);
            }

            if ui.add_sized([72.0, 28.0], egui::Button::new("Tracer")).clicked() {
                self.tracer_via_noyau();
            }
        });

        if !self.erreur_courbe.is_empty() {
            ui.colored_label(ui.visuals().error_fg_color, &self.erreur_courbe);
        } else if !self.courbe.is_empty() {
            ui.label(format!(
                "{} points, {} tracés",
                self.courbe.len(),
                self.points_traces()
            ));
        }

        ui.add_space(4.0);

        let taille = egui::vec2(ui.available_width(), HAUTEUR_TRACE);
        let (resp, painter) = ui.allocate_painter(taille, egui::Sense::hover());
        let repere = Repere::new(resp.rect, self.zoom);
        let encre = ui.visuals().text_color();

        self.dessiner_axes(&painter, &repere, encre);
        self.dessiner_courbe(&painter, &repere);

        if let Some(p) = resp.hover_pos() {
            let (mx, my) = repere.vers_math(p);
            let local = p - repere.zone().min;
            painter.text(
                repere.zone().left_top() + egui::vec2(6.0, 6.0),
                Align2::LEFT_TOP,
                format!(
                    "écran ({:.0}, {:.0})   math ({mx:.3}, {my:.3})",
                    local.x, local.y
                ),
                FontId::monospace(12.0),
                encre,
            );
        }
    }

    fn dessiner_axes(&self, painter: &egui::Painter, repere: &Repere, encre: Color32) {
        let zone = repere.zone();
        let o = repere.origine();
        let trait_axe = Stroke::new(1.0, encre);

        // axe x + flèche à droite
        let droite = Pos2::new(zone.right(), o.y);
        painter.line_segment([Pos2::new(zone.left(), o.y), droite], trait_axe);
        painter.add(egui::Shape::convex_polygon(
            vec![
                droite,
                droite + egui::vec2(-TAILLE_FLECHE, -TAILLE_FLECHE / 2.0),
                droite + egui::vec2(-TAILLE_FLECHE, TAILLE_FLECHE / 2.0),
            ],
            encre,
            Stroke::NONE,
        ));

        // axe y + flèche en haut
        let haut = Pos2::new(o.x, zone.top());
        painter.line_segment([Pos2::new(o.x, zone.bottom()), haut], trait_axe);
        painter.add(egui::Shape::convex_polygon(
            vec![
                haut,
                haut + egui::vec2(TAILLE_FLECHE / 2.0, TAILLE_FLECHE),
                haut + egui::vec2(-TAILLE_FLECHE / 2.0, TAILLE_FLECHE),
            ],
            encre,
            Stroke::NONE,
        ));

        // une graduation par pas sur l’axe x
        if self.pas * self.zoom < ECART_GRADUATION_MIN {
            return;
        }
        let (xmin, xmax) = repere.x_visibles();
        let premier = (xmin / self.pas).ceil() as i64;
        let dernier = (xmax / self.pas).floor() as i64;
        for k in premier..=dernier {
            let p = repere.vers_ecran(k as f32 * self.pas, 0.0);
            painter.line_segment(
                [
                    p + egui::vec2(0.0, -DEMI_GRADUATION),
                    p + egui::vec2(0.0, DEMI_GRADUATION),
                ],
                trait_axe,
            );
        }
    }

    fn dessiner_courbe(&self, painter: &egui::Painter, repere: &Repere) {
        let ecran = |pt: &Option<[f32; 2]>| {
            pt.map(|[x, y]| repere.vers_ecran(x, y))
                .filter(|p| repere.tracable(*p))
        };

        // segments entre points consécutifs valides ; un point en erreur coupe la courbe
        for paire in self.courbe.windows(2) {
            if let (Some(a), Some(b)) = (ecran(&paire[0]), ecran(&paire[1])) {
                painter.line_segment([a, b], Stroke::new(1.5, Color32::RED));
            }
        }
        for p in self.courbe.iter().filter_map(ecran) {
            painter.circle_filled(p, 2.0, Color32::RED);
        }
    }

    /* ------------------------ Boutons ------------------------ */

    fn bouton_action(&mut self, ui: &mut egui::Ui, label: &str, tip: &str, action: Action) {
        let resp = ui
            .add_sized([56.0, 30.0], egui::Button::new(label))
            .on_hover_text(tip);

        if resp.clicked() {
            match action {
                Action::ClearEntree => self.clear_entree(),
                Action::ClearResultats => self.clear_resultats(),
                Action::ResetTotal => self.reset_total(),
                Action::Backspace => self.backspace_entree(),
            }
            self.focus_entree = true;
        }
    }

    fn bouton_insert(&mut self, ui: &mut egui::Ui, label: &str, to_insert: &str, kind: InsertKind) {
        let resp = ui.add_sized([46.0, 28.0], egui::Button::new(label));
        if resp.clicked() {
            self.inserer(to_insert, kind);
        }
    }

    /// Insère un morceau d’expression en gardant l’entrée lisible.
    ///
    /// Attention : un espace coupe un nombre en deux jetons, on n’en met donc
    /// jamais entre deux chiffres.
    fn inserer(&mut self, to_insert: &str, kind: InsertKind) {
        let dernier = self.entree.chars().rev().find(|c| !c.is_whitespace());

        match kind {
            InsertKind::CloseParen => {
                self.entree.truncate(self.entree.trim_end().len());
                self.entree.push_str(to_insert);
            }
            InsertKind::Separateur => {
                self.entree.truncate(self.entree.trim_end().len());
                self.entree.push_str(to_insert);
                self.entree.push(' ');
            }
            InsertKind::OpenParen | InsertKind::Func => {
                if matches!(dernier, Some(c) if c.is_ascii_alphanumeric() || c == ')') {
                    self.entree.push(' ');
                }
                self.entree.push_str(to_insert);
            }
            InsertKind::Op => {
                self.entree.truncate(self.entree.trim_end().len());
                if !self.entree.is_empty() {
                    self.entree.push(' ');
                }
                self.entree.push_str(to_insert);
                self.entree.push(' ');
            }
            InsertKind::Digit => self.entree.push_str(to_insert),
            InsertKind::Word => {
                if !self.entree.ends_with(char::is_whitespace)
                    && matches!(dernier, Some(c) if c.is_ascii_digit() || c == ')')
                {
                    self.entree.push(' ');
                }
                self.entree.push_str(to_insert);
            }
        }

        self.focus_entree = true;
    }

    /* ------------------------ Noyau ------------------------ */

    /// Compile l’entrée, l’évalue en `x`, puis dépose résultat + démarche dans l’état UI.
    fn eval_via_noyau(&mut self) {
        let s = self.entree.trim();
        if s.is_empty() {
            self.set_erreur("Entrée vide");
            return;
        }

        let x = self.x;
        let r = noyau::compile(s).and_then(|c| {
            let v = c.evaluate_at(x)?;
            let d = Demarche {
                jetons: c.tokens_text().to_string(),
                rpn: c.rpn_text(),
            };
            Ok((v, d))
        });

        match r {
            Ok((v, d)) => self.set_resultat(v, d),
            Err(e) => {
                tracing::debug!(erreur = %e, "évaluation refusée");
                self.set_erreur(e.to_string());
            }
        }
    }

    /// Échantillonne l’entrée sur [début ; fin] et dépose les points.
    fn tracer_via_noyau(&mut self) {
        let s = self.entree.trim();
        if s.is_empty() {
            self.set_erreur_courbe("Entrée vide");
            return;
        }

        let (debut, fin, pas) = (self.debut, self.fin, self.pas);
        match noyau::compile(s).and_then(|c| c.sample(debut, fin, pas)) {
            Ok(points) if points.is_empty() => {
                self.set_erreur_courbe("Intervalle vide : début > fin");
            }
            Ok(points) => {
                self.set_courbe(points.into_iter().map(|p| (p.x, p.y.ok())));
                tracing::info!(
                    points = self.courbe.len(),
                    traces = self.points_traces(),
                    "courbe tracée"
                );
            }
            Err(e) => self.set_erreur_courbe(e.to_string()),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Action {
    ClearEntree,
    ClearResultats,
    ResetTotal,
    Backspace,
}

#[derive(Clone, Copy, Debug)]
enum InsertKind {
    Digit,
    Word,
    Func,
    Op,
    Separateur,
    OpenParen,
    CloseParen,
}
