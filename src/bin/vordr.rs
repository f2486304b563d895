//! vordr — stance classification CLI
//!
//! Classifies lines of text from a file or stdin using the bundled local
//! inference providers, printing one JSON result per line.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use vordr::Vordr;
use vordr::providers::{
    Device, FastEmbedProvider, HttpTranslator, LocalEmbeddingModel, LocalNliModel,
    LocalSarcasmModel, LocalSentimentModel, OnnxSarcasmProvider, OnnxSentimentProvider,
    OnnxZeroShotProvider,
};

/// Vordr stance classification CLI
#[derive(Parser)]
#[command(name = "vordr")]
#[command(version)]
#[command(about = "Classify political stance of short texts")]
struct Args {
    /// File of texts to classify, one per line (or omit to read from stdin)
    input: Option<PathBuf>,

    /// Directory of per-label anchor files
    #[arg(long, env = "VORDR_ANCHORS_DIR", default_value = "data/anchors")]
    anchors: PathBuf,

    /// Path to the classifier artifact
    #[arg(
        long,
        env = "VORDR_CLASSIFIER",
        default_value = "models/final_classifier.json"
    )]
    classifier: PathBuf,

    /// Base URL of a LibreTranslate-compatible service for non-English input
    #[arg(long, env = "VORDR_TRANSLATOR_URL")]
    translator_url: Option<String>,

    /// Skip the zero-shot context model (faster startup, uniform context signal)
    #[arg(long)]
    no_context: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vordr=info".into()),
        )
        .init();

    let args = Args::parse();
    let device = Device::cpu();

    let mut builder = Vordr::builder()
        .embedder(Arc::new(FastEmbedProvider::new(
            LocalEmbeddingModel::ParaphraseMlMpnetBaseV2,
        )?))
        .sentiment(Arc::new(OnnxSentimentProvider::new(
            LocalSentimentModel::TwitterRobertaBase,
            device,
        )?))
        .sarcasm(Arc::new(OnnxSarcasmProvider::new(
            LocalSarcasmModel::TwitterRobertaIrony,
            device,
        )?))
        .anchors_dir(args.anchors)
        .classifier_artifact(args.classifier);

    if let Some(url) = args.translator_url {
        builder = builder.translator(Arc::new(HttpTranslator::new(url)));
    }
    if !args.no_context {
        builder = builder.lazy_context(move || {
            let provider =
                OnnxZeroShotProvider::new(LocalNliModel::NliDebertaV3Small, device)?;
            Ok(Arc::new(provider) as Arc<dyn vordr::providers::ContextProvider>)
        });
    }

    let engine = builder.build().await?;

    let stdin = io::stdin();
    let mut lines: Box<dyn Iterator<Item = io::Result<String>>> = match &args.input {
        Some(path) => Box::new(io::BufReader::new(std::fs::File::open(path)?).lines()),
        None => {
            if stdin.is_terminal() {
                eprintln!("reading texts from stdin, one per line (ctrl-d to finish)");
            }
            Box::new(stdin.lock().lines())
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    while let Some(line) = lines.next() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match engine.classify(&line).await {
            Ok(result) => {
                serde_json::to_writer(&mut out, &result)?;
                out.write_all(b"\n")?;
            }
            Err(e) => eprintln!("error: {e}"),
        }
    }

    Ok(())
}
