use anyhow::Context;
use clap::Parser;
use collector_corner_cli::{
    render_preview, utils, Assembler, Config, EditionMonth, Field, RawSource, Session,
};
use dotenv::dotenv;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Draft a Collector's Corner newsletter", long_about = None)]
struct Args {
    /// Product or article page to draft from
    #[arg(short, long)]
    url: Option<String>,

    /// Shop notes to draft from (wins over --url)
    #[arg(short, long, conflicts_with = "text_file")]
    text: Option<String>,

    /// Read shop notes from a file
    #[arg(long)]
    text_file: Option<PathBuf>,

    /// Edition month, e.g. "April" or "apr" (defaults to the current month)
    #[arg(short, long)]
    month: Option<EditionMonth>,

    /// Collector spotlight paragraph
    #[arg(long)]
    spotlight: Option<String>,

    /// Call to action line
    #[arg(long)]
    cta: Option<String>,

    /// Where fields.json and preview.md are written
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    let notes = match &args.text_file {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?,
        ),
        None => args.text.clone(),
    };
    let source = RawSource::select(args.url.as_deref(), notes.as_deref())?;
    let month = args.month.unwrap_or_else(EditionMonth::current);

    let assembler = Assembler::from_config(&config).context("building HTTP clients")?;
    let mut session = Session::new();
    if let Some(spotlight) = args.spotlight {
        session.set(Field::Spotlight, spotlight);
    }
    if let Some(cta) = args.cta {
        session.set(Field::CallToAction, cta);
    }

    assembler.assemble(&source, month, &mut session).await?;

    let preview = render_preview(month, session.fields(), &config.shop_name);

    utils::ensure_dir(&args.out_dir)?;
    utils::save_json(
        &json!({
            "month": month,
            "fields": session.fields(),
            "full_text": session.full_text(),
        }),
        &args.out_dir.join("fields.json"),
    )?;
    utils::save_text(&preview, &args.out_dir.join("preview.md"))?;

    let empty: Vec<_> = Field::ALL
        .into_iter()
        .filter(|f| f.section().is_some() && session.get(*f).is_empty())
        .collect();
    if !empty.is_empty() {
        info!(?empty, "draft had no text for some sections; fill them in by hand");
    }

    println!("{preview}");
    Ok(())
}
