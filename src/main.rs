// src/main.rs
//
// Calculatrice RPN — point d’entrée natif
// ---------------------------------------
// - Journal : tracing-subscriber, filtre via RUST_LOG (défaut : info)
// - Fenêtre : eframe::run_native + NativeOptions
//
// Le moteur (jetons, RPN, évaluation, courbe) vit dans la bibliothèque
// calculatrice_rpn::noyau ; ici, seulement l’UI.

use eframe::egui;
use tracing_subscriber::EnvFilter;

mod app;

use app::AppCalc;

const TITRE_APP: &str = "Calculatrice RPN";

fn installer_journal() {
    let filtre = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filtre).init();
}

fn main() -> eframe::Result<()> {
    installer_journal();
    tracing::info!(titre = TITRE_APP, "démarrage");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITRE_APP)
            .with_inner_size([640.0, 900.0])
            .with_min_inner_size([480.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        TITRE_APP,
        options,
        Box::new(|_cc| Ok(Box::<AppCalc>::default())),
    )
}
