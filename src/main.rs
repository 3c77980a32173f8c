use clap::{Parser, Subcommand};
use star::{path_cmp, Archive, Stream};
use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "star", about = "The STAR archive container CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack files into a new archive (inputs are stored name-sorted)
    #[command(visible_alias = "c")]
    Create {
        archive: PathBuf,
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },
    /// Extract all files, or just the named ones
    #[command(visible_alias = "x")]
    Extract {
        archive: PathBuf,
        files: Vec<PathBuf>,
        #[arg(short = 'C', long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// List the contents of one or more archives
    #[command(visible_alias = "l")]
    List {
        #[arg(required = true, num_args = 1..)]
        archives: Vec<PathBuf>,
        /// Emit one JSON document instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Show archive-level details
    Info {
        archive: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match Cli::parse().command {
        Commands::Create { archive, files } => create(&archive, files),
        Commands::Extract { archive, files, output_dir } => extract(&archive, &files, &output_dir),
        Commands::List { archives, json } => list(&archives, json),
        Commands::Info { archive } => info(&archive),
    };

    if let Err(e) = result {
        eprintln!("star: {e}");
        std::process::exit(1);
    }
}

// ── Create ────────────────────────────────────────────────────────────────────

fn create(archive: &Path, mut files: Vec<PathBuf>) -> Result<(), Box<dyn Error>> {
    // Name-sorted archives are bisectable; see Archive::binary_search.
    files.sort_by(|a, b| path_cmp(a.to_string_lossy().as_bytes(), b.to_string_lossy().as_bytes()));

    let mut ar = Archive::new(files.len() as u64)?;
    for (index, path) in files.iter().enumerate() {
        let size = std::fs::metadata(path)
            .map_err(|e| format!("{}: {e}", path.display()))?
            .len();
        let file = File::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
        ar.add_file(index, path.to_string_lossy().as_bytes(), size, Stream::file(file))?;
        println!("  added  {} ({size} B)", path.display());
    }
    ar.compute_offsets()?;
    ar.write(Stream::file(File::create(archive)?))?;
    println!("Created: {}", archive.display());
    Ok(())
}

// ── Extract ───────────────────────────────────────────────────────────────────

fn extract(archive: &Path, names: &[PathBuf], output_dir: &Path) -> Result<(), Box<dyn Error>> {
    let file = File::open(archive).map_err(|e| format!("{}: {e}", archive.display()))?;
    let ar = Archive::read(Stream::file(file))?;

    if names.is_empty() {
        for (_, entry) in ar.entries() {
            extract_entry(entry, output_dir);
        }
    } else {
        for name in names {
            let key = name.to_string_lossy();
            match ar.linear_search(key.as_bytes()).and_then(|i| ar.entry(i)) {
                Some(entry) => extract_entry(entry, output_dir),
                None => eprintln!("star: no entry named `{key}` in {}", archive.display()),
            }
        }
    }
    Ok(())
}

/// Write one payload to `dir/<stored path>`. Failures are reported and the
/// batch continues; parent directories are not created.
fn extract_entry(entry: &star::Entry, output_dir: &Path) {
    let name = String::from_utf8_lossy(entry.path()).into_owned();
    let dest = output_dir.join(&name);
    let result = File::create(&dest)
        .map(Stream::file)
        .and_then(|mut sink| sink.write_all(entry.data()));
    match result {
        Ok(()) => println!("  extracted  {} ({} B)", dest.display(), entry.size()),
        Err(e) => eprintln!("star: {}: {e}", dest.display()),
    }
}

// ── List ──────────────────────────────────────────────────────────────────────

fn list(archives: &[PathBuf], json: bool) -> Result<(), Box<dyn Error>> {
    let mut failed = 0;
    let mut documents = Vec::new();

    for path in archives {
        let opened = File::open(path)
            .map_err(star::StarError::from)
            .and_then(|f| Archive::read(Stream::file(f)));
        let ar = match opened {
            Ok(ar) => ar,
            Err(e) => {
                eprintln!("star: {}: {e}", path.display());
                failed += 1;
                continue;
            }
        };

        if json {
            documents.push(serde_json::json!({
                "archive": path.display().to_string(),
                "files": ar.list(),
            }));
        } else {
            println!("{}:", path.display());
            println!("  {:<40} {:>12} {:>12}", "Path", "Size", "Offset");
            for info in ar.list() {
                println!("  {:<40} {:>12} {:>12}", info.path, info.size, info.offset);
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&documents)?);
    }
    if failed > 0 {
        return Err(format!("{failed} archive(s) could not be read").into());
    }
    Ok(())
}

// ── Info ──────────────────────────────────────────────────────────────────────

fn info(archive: &Path) -> Result<(), Box<dyn Error>> {
    let file = File::open(archive).map_err(|e| format!("{}: {e}", archive.display()))?;
    let ar = Archive::read(Stream::file(file))?;
    let files = ar.list();
    let data_start = files.first().map(|f| f.offset).unwrap_or(0);
    let data_bytes: u64 = files.iter().map(|f| f.size).sum();

    println!("── STAR Archive ─────────────────────────────────────────");
    println!("  Path        {}", archive.display());
    println!("  Magic       0x{}", hex::encode(star::MAGIC));
    println!("  Files       {}", ar.file_count());
    println!("  Data start  {data_start} B");
    println!("  Data bytes  {data_bytes} B");
    println!("  Total size  {} B", ar.encoded_len()?);
    Ok(())
}
