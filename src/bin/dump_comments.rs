use docx_comments::extract_comments_from_docx;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let data_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./data"));
    if !data_dir.exists() {
        println!("No {} directory found. Create it and place .docx files there.", data_dir.display());
        return Ok(());
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(&data_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("docx")))
        .collect();
    paths.sort();

    for path in paths {
        println!("Scanning {}", path.display());
        match extract_comments_from_docx(&path) {
            Ok(comments) => {
                println!("Found {} comments", comments.len());
                for c in &comments {
                    println!("[p.{}] {}: {} -> {}", c.page, c.author, c.text, c.referenced_text);
                }
            }
            Err(e) => log::error!("Failed to read {}: {:#}", path.display(), e),
        }
    }

    Ok(())
}
