use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Parser;
use memmap2::Mmap;
use tracing_subscriber::EnvFilter;

use preinstanced::decode_buffer;
use preinstanced::export::obj;

/// Decode The Simpsons Game .preinstanced mesh containers.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Write one Wavefront OBJ per input file into this directory
    #[clap(short, long)]
    obj: Option<PathBuf>,

    /// .preinstanced file(s) or glob patterns
    paths: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut paths = Vec::new();
    for pattern in &args.paths {
        let mut matched = false;
        for entry in glob::glob(pattern)? {
            paths.push(entry?);
            matched = true;
        }
        if !matched {
            tracing::warn!(%pattern, "no files match");
        }
    }

    for path in paths {
        let file = File::open(&path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        let decoded = decode_buffer(&mmap);
        let stats = &decoded.stats;
        println!(
            "{}: {} sub-meshes from {} chunks ({} skipped, {} triangles dropped)",
            path.display(),
            stats.sub_meshes_decoded,
            stats.chunks_found,
            stats.sub_meshes_skipped,
            stats.triangles_dropped,
        );

        if let Some(out_dir) = &args.obj {
            std::fs::create_dir_all(out_dir)?;
            let stem = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "mesh".to_string());
            let out_path = out_dir.join(format!("{stem}.obj"));
            let mut out = BufWriter::new(File::create(&out_path)?);
            obj::write_obj(&mut out, &decoded.records)?;
            println!("  wrote {}", out_path.display());
        }
    }

    Ok(())
}
