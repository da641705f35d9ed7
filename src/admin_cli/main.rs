// src/admin_cli/main.rs

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use otica_backoffice::{
    config::{AppState, Config},
    db::UserRepository,
    models::auth::UserRole,
    services::auth::hash_password,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, verbatim_doc_comment)]
/// Utilitário de linha de comando para administrar o backoffice.
/// Cria o primeiro SUPER_ADMIN, roda migrações e confere caixas.
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Aplica as migrações pendentes.
    Migrate,
    /// Cria um usuário SUPER_ADMIN (sem franquia).
    CreateSuperAdmin {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        full_name: String,
    },
    /// Recalcula os totais das sessões de caixa a partir das ordens e lista divergências.
    ReconcileSessions {
        /// Limita a uma franquia.
        #[arg(long)]
        franchise_id: Option<Uuid>,

        /// Grava os valores recalculados.
        #[arg(long, default_value_t = false)]
        apply: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Falha ao carregar a configuração")?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database_url)
        .await
        .context("Falha ao conectar ao banco de dados")?;

    match cli.command {
        Commands::Migrate => {
            sqlx::migrate!().run(&pool).await.context("Falha ao rodar as migrações")?;
            println!("Migrações aplicadas.");
        }
        Commands::CreateSuperAdmin { email, password, full_name } => {
            let email = email.trim().to_lowercase();
            if password.len() < 8 {
                bail!("A senha precisa ter pelo menos 8 caracteres");
            }

            let password_hash = hash_password(&password).await?;
            let user = UserRepository::new(pool.clone())
                .create_user(&pool, &email, &password_hash, full_name.trim(), UserRole::SuperAdmin, None)
                .await?;

            println!("SUPER_ADMIN criado: {} ({})", user.email, user.id);
        }
        Commands::ReconcileSessions { franchise_id, apply } => {
            let app_state = AppState::from_pool(pool, config)?;
            let report = app_state.cashier_service.reconcile_all(franchise_id, apply).await?;

            for drift in report.drifted() {
                println!(
                    "sessão {}: total gravado {} / recalculado {}, diferença gravada {:?} / recalculada {:?}",
                    drift.session_id,
                    drift.stored.total_sales,
                    drift.recomputed.total_sales,
                    drift.stored_difference,
                    drift.recomputed_difference,
                );
            }
            for session_id in &report.failed {
                eprintln!("sessão {session_id}: falha na reconciliação (ver log)");
            }

            println!(
                "{} sessões conferidas, {} divergentes{}, {} com falha",
                report.drifts.len(),
                report.drifted().count(),
                if apply { " (corrigidas)" } else { "" },
                report.failed.len(),
            );
            if !report.failed.is_empty() {
                bail!("{} sessões não puderam ser reconciliadas", report.failed.len());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_reconcile_flags() {
        let cli = Cli::parse_from(["admin-cli", "reconcile-sessions", "--apply"]);
        match cli.command {
            Commands::ReconcileSessions { franchise_id, apply } => {
                assert!(franchise_id.is_none());
                assert!(apply);
            }
            other => panic!("comando inesperado: {other:?}"),
        }
    }
}
