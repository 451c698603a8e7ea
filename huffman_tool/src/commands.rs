use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use dyn_size_of::GetSize;
use log::{debug, info};
use text_huffman::{Container, Frequencies, HuffmanError, PayloadFormat, Session};
use thiserror::Error;

/// Errors reported by the subcommands.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{0}: {1}")]
    IoContext(String, #[source] std::io::Error),

    #[error(transparent)]
    Huffman(#[from] HuffmanError),

    #[error("decoded text differs from the original at symbol {0}")]
    Mismatch(usize),
}

pub type Result<T> = std::result::Result<T, ToolError>;

fn io_context(path: &Path) -> impl FnOnce(std::io::Error) -> ToolError + '_ {
    move |e| ToolError::IoContext(path.display().to_string(), e)
}

/// Returns `path` with `extension` appended to its file name.
fn with_extension(path: &Path, extension: &str) -> PathBuf {
    let mut result = path.as_os_str().to_owned();
    result.push(".");
    result.push(extension);
    result.into()
}

fn read_text(input: &Path) -> Result<String> {
    let text = fs::read_to_string(input).map_err(io_context(input))?;
    debug!("read {} bytes from {}", text.len(), input.display());
    Ok(text)
}

fn build(text: &str) -> Result<Session> {
    let session = Session::build(text)?;
    debug!("session occupies {} bytes", session.size_bytes());
    Ok(session)
}

fn write_file(output: &Path, content: impl AsRef<[u8]>) -> Result<()> {
    fs::write(output, content).map_err(io_context(output))?;
    info!("Saved to {}", output.display());
    Ok(())
}

/// Returns the index of the first symbol that differs between `original` and `decoded`.
fn first_difference(original: &str, decoded: &str) -> Option<usize> {
    let mut o = original.chars();
    let mut d = decoded.chars();
    let mut index = 0;
    loop {
        match (o.next(), d.next()) {
            (None, None) => return None,
            (a, b) if a != b => return Some(index),
            _ => index += 1,
        }
    }
}

pub fn compress(input: &Path, output: Option<&Path>, packed: bool) -> Result<()> {
    let text = read_text(input)?;
    let session = build(&text)?;
    let format = if packed { PayloadFormat::Packed } else { PayloadFormat::Text };
    let container = Container::pack(&session, &text, format)?;
    let output = output.map_or_else(|| with_extension(input, "huf"), Path::to_path_buf);
    let mut file = BufWriter::new(File::create(&output).map_err(io_context(&output))?);
    container.write(&mut file).and_then(|()| file.flush()).map_err(io_context(&output))?;
    info!("Saved {} bytes to {}", container.write_bytes(), output.display());
    println!("{}", session.stats());
    Ok(())
}

pub fn decompress(input: &Path, output: Option<&Path>) -> Result<()> {
    let file = File::open(input).map_err(io_context(input))?;
    let container = Container::read(&mut BufReader::new(file))?;
    let text = container.unpack()?;
    let output = match output {
        Some(output) => output.to_path_buf(),
        None if input.extension().is_some_and(|e| e == "huf") => input.with_extension(""),
        None => with_extension(input, "txt"),
    };
    write_file(&output, text)
}

pub fn raw(input: &Path, output: Option<&Path>) -> Result<()> {
    let text = read_text(input)?;
    let session = build(&text)?;
    let encoded = session.encode(&text)?;
    let output = output.map_or_else(|| with_extension(input, "bits"), Path::to_path_buf);
    write_file(&output, &encoded)?;
    let decoded = session.decode(&encoded)?;
    if let Some(index) = first_difference(&text, &decoded) {
        return Err(ToolError::Mismatch(index));
    }
    info!("Decoded text matches the original");
    println!("{}", session.stats());
    Ok(())
}

pub fn codes(input: &Path) -> Result<()> {
    let text = read_text(input)?;
    let session = build(&text)?;
    let (symbols, counts) = session.frequencies().clone().into_sorted();
    println!("{:<10} | {:<10} | Code", "Symbol", "Count");
    println!("{:-<10}-|-{:-<10}-|-----------------", "", "");
    for (symbol, count) in symbols.iter().zip(counts.iter()).rev() {
        let code = session.codes().code(*symbol)?;
        println!("{:<10} | {:<10} | {}", format!("{symbol:?}"), count, code);
    }
    println!("\n{}", session.stats());
    Ok(())
}
