// src/config.rs

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use serde::{Deserialize, Serialize};

use crate::common::error::AppError;

// Toda a configuração é imutável e passada por referência para os serviços.
// Nada de singleton de fonte/estilo: renderizações repetidas ou paralelas
// não podem interferir umas nas outras.

/// Identidade da empresa impressa nos cabeçalhos e rodapés dos documentos.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub name: String,
    /// CNPJ/CPF exibido abaixo do nome.
    pub document_number: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// Chave PIX para o bloco de pagamento (com QR Code) nas faturas.
    pub pix_key: Option<String>,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "CONDUTOR CABOS".to_string(),
            document_number: None,
            address: None,
            phone: None,
            pix_key: None,
        }
    }
}

impl CompanyProfile {
    /// Carrega o perfil de um arquivo JSON (o app desktop salva um ao lado
    /// do executável).
    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)?;
        let profile = serde_json::from_str(&raw)
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("perfil da empresa inválido: {e}")))?;
        Ok(profile)
    }
}

/// Geometria e adornos da renderização. Papel é A4 fixo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    /// Pasta com os .ttf da família (Regular/Bold/Italic/BoldItalic).
    pub font_dir: PathBuf,
    pub font_name: String,
    pub margins_mm: i32,
    pub currency_symbol: String,
    pub show_logo: bool,
    pub logo_path: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_dir: PathBuf::from("./fonts"),
            font_name: "Roboto".to_string(),
            margins_mm: 10,
            currency_symbol: "R$".to_string(),
            show_logo: false,
            logo_path: None,
        }
    }
}

/// Parâmetros do fluxo de impressão e do ciclo de vida dos temporários.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintConfig {
    pub temp_dir: PathBuf,
    /// Janela de retenção dos PDFs temporários antes da varredura apagar.
    pub retention_hours: u64,
    /// Pausa entre itens do lote: a impressora é um recurso físico
    /// compartilhado, não adianta afogar a fila.
    pub batch_pause_ms: u64,
    /// Abre o PDF no visualizador antes do gate de confirmação.
    pub preview_before_send: bool,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            temp_dir: env::temp_dir().join("condutor"),
            retention_hours: 24,
            batch_pause_ms: 750,
            preview_before_send: false,
        }
    }
}

impl PrintConfig {
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_hours * 3600)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    pub company: CompanyProfile,
    pub render: RenderConfig,
    pub print: PrintConfig,
}

impl EngineConfig {
    /// Carrega a configuração do ambiente. O `.env` é opcional no desktop,
    /// então `dotenv().ok()` em vez de expect.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut cfg = Self::default();

        if let Ok(name) = env::var("CONDUTOR_COMPANY_NAME") {
            cfg.company.name = name;
        }
        cfg.company.document_number = env::var("CONDUTOR_COMPANY_DOCUMENT").ok();
        cfg.company.address = env::var("CONDUTOR_COMPANY_ADDRESS").ok();
        cfg.company.phone = env::var("CONDUTOR_COMPANY_PHONE").ok();
        cfg.company.pix_key = env::var("CONDUTOR_PIX_KEY").ok();

        if let Ok(dir) = env::var("CONDUTOR_FONT_DIR") {
            cfg.render.font_dir = PathBuf::from(dir);
        }
        if let Ok(name) = env::var("CONDUTOR_FONT_NAME") {
            cfg.render.font_name = name;
        }
        if let Ok(symbol) = env::var("CONDUTOR_CURRENCY") {
            cfg.render.currency_symbol = symbol;
        }
        if let Ok(path) = env::var("CONDUTOR_LOGO_PATH") {
            cfg.render.logo_path = Some(PathBuf::from(path));
            cfg.render.show_logo = true;
        }
        if let Ok(dir) = env::var("CONDUTOR_TEMP_DIR") {
            cfg.print.temp_dir = PathBuf::from(dir);
        }

        tracing::info!(
            "Configuração carregada: empresa '{}', temporários em {}",
            cfg.company.name,
            cfg.print.temp_dir.display()
        );
        cfg
    }
}
