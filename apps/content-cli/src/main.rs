use std::{fs::read_to_string, path::Path, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use jwst_content::{
    info, Block, BlockRegistry, ContentConfig, ContentField, ContentRecord, Document, ExecutedMutations, ImageBlock,
    MemoryStore, PersistedContent, RelationshipBlock, SerializedContent, StructuralBlock,
};
use serde::Serialize;
use serde_json::Value;

/// rich-text content transformer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract block mutations from a document
    Serialize {
        /// Path of the document json
        #[arg(short, long)]
        input: String,
    },
    /// Replace mutation paths of a serialized document with join ids
    Resolve {
        /// Path of the serialized content json
        #[arg(short, long)]
        input: String,
        /// Path of the executed mutation results json
        #[arg(short, long)]
        results: String,
    },
    /// Rebuild a document from its persisted form and fetched records
    Deserialize {
        /// Path of the persisted content json
        #[arg(short, long)]
        input: String,
    },
    /// Save a document into an in-memory store and load it back
    Roundtrip {
        /// Path of the document json
        #[arg(short, long)]
        input: String,
        /// Owner id of the content
        #[arg(short, long, default_value = "content")]
        owner: String,
    },
}

fn field() -> anyhow::Result<ContentField> {
    let blocks: Vec<Arc<dyn Block>> = vec![
        Arc::new(StructuralBlock::new("paragraph")),
        Arc::new(StructuralBlock::new("heading")),
        Arc::new(StructuralBlock::new("blockquote")),
        Arc::new(ImageBlock::default()),
        Arc::new(RelationshipBlock::new("relationship", "posts")),
    ];
    let registry = BlockRegistry::from_blocks(blocks)?;
    Ok(ContentField::new(registry).with_config(ContentConfig::from_env()))
}

fn load_json(path: impl AsRef<Path>) -> anyhow::Result<Value> {
    let path = path.as_ref();
    let text = read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

#[derive(Serialize)]
struct Roundtrip {
    record: ContentRecord,
    document: Document,
}

fn print(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    jwst_logger::init_logger(["jwst-content", "content-cli"]);

    let args = Args::parse();
    let field = field()?;
    info!("loaded {} blocks", field.registry().len());

    match args.command {
        Command::Serialize { input } => {
            let document = Document::from_value(load_json(input)?)?;
            print(&field.serialize(&document)?)
        }
        Command::Resolve { input, results } => {
            let serialized: SerializedContent = serde_json::from_value(load_json(input)?)?;
            let executed: ExecutedMutations = serde_json::from_value(load_json(results)?)?;
            print(&field.resolve(serialized.document, &executed)?)
        }
        Command::Deserialize { input } => {
            let persisted: PersistedContent = serde_json::from_value(load_json(input)?)?;
            print(&field.deserialize(persisted)?)
        }
        Command::Roundtrip { input, owner } => {
            let document = Document::from_value(load_json(input)?)?;
            let store = MemoryStore::new();

            let record = field.save(&owner, &document, &store).await?;
            let loaded = field.load(&record, &store).await?;
            print(&Roundtrip {
                record,
                document: loaded,
            })
        }
    }
}
