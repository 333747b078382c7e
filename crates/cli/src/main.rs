use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_app::{modules::library::LibraryEvent, LibraryService};
use shelf_authz::Address;
use shelf_kernel::settings::Settings;

#[derive(Parser)]
#[command(name = "shelf", version, about = "Library registry service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Deploy the registry and serve it over HTTP until interrupted
    Serve {
        /// Override `server.port`
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run a scripted session against an in-process registry
    Demo {
        /// Deployer address; defaults to the configured owner
        #[arg(long)]
        owner: Option<Address>,
    },
    /// Print the resolved settings as JSON
    Settings,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port } => {
            let mut settings = load_settings()?;
            if let Some(port) = port {
                settings.server.port = port;
            }
            shelf_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "shelf serve starting");
            shelf_app::app::serve(settings).await
        }
        Command::Demo { owner } => {
            let owner = match owner {
                Some(owner) => owner,
                None => load_settings()?.library.owner,
            };
            demo(owner).await
        }
        Command::Settings => {
            let settings = load_settings()?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}

fn load_settings() -> anyhow::Result<Settings> {
    Settings::load().with_context(|| "failed to load shelf settings")
}

/// Add a book, list the shelf, borrow the book and show who borrowed it.
async fn demo(owner: Address) -> anyhow::Result<()> {
    let library = LibraryService::deploy(owner, 16);
    println!("Library deployed, owner {owner}");

    let receipt = library
        .add_book(owner, "Awesome Book 2", "By Me", 10)
        .await
        .context("addBook failed")?;
    print_events(&receipt.events);
    println!("Book added successfully");

    for (id, book) in library.all_books().await.iter().enumerate() {
        println!(
            "All books: #{id} {} by {} ({} copies)",
            book.name, book.author, book.copies
        );
    }

    let receipt = library
        .borrow_book(owner, 0)
        .await
        .context("borrowBook failed")?;
    print_events(&receipt.events);

    let history = library.book_history(0).await?;
    let borrowers: Vec<String> = history.iter().map(Address::to_string).collect();
    println!("Addresses that borrowed book: {}", borrowers.join(","));

    Ok(())
}

fn print_events(events: &[LibraryEvent]) {
    for event in events {
        println!("  event {} (book #{})", event.name(), event.book_id());
    }
}
