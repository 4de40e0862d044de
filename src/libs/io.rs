use anyhow::Context;
use std::io::{BufRead, BufReader, BufWriter, Write};

/// Opens `input` for buffered reading. `stdin` and `-` read standard input;
/// files ending in `.gz` are decompressed on the fly.
///
/// ```
/// use std::io::BufRead;
/// let reader = anchain::reader("tests/agp/draft.agp").unwrap();
/// let lines: Vec<_> = reader.lines().collect();
/// assert_eq!(lines.len(), 6);
///
/// assert!(anchain::reader("tests/agp/missing.agp").is_err());
/// ```
pub fn reader(input: &str) -> anyhow::Result<Box<dyn BufRead>> {
    let reader: Box<dyn BufRead> = if input == "stdin" || input == "-" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let path = std::path::Path::new(input);
        let file = std::fs::File::open(path)
            .with_context(|| format!("could not open {}", path.display()))?;

        if path.extension() == Some(std::ffi::OsStr::new("gz")) {
            Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        }
    };

    Ok(reader)
}

/// Opens `output` for buffered writing. `stdout` and `-` write standard output.
pub fn writer(output: &str) -> anyhow::Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = if output == "stdout" || output == "-" {
        Box::new(BufWriter::new(std::io::stdout()))
    } else {
        let file = std::fs::File::create(output)
            .with_context(|| format!("could not create {}", output))?;
        Box::new(BufWriter::new(file))
    };

    Ok(writer)
}

/// Reads whitespace-separated words, e.g. the `genomes` file of a map directory.
///
/// ```
/// let genomes = anchain::read_words("tests/hits/map/genomes").unwrap();
/// assert_eq!(genomes, vec!["human", "mouse", "rat"]);
/// ```
pub fn read_words(input: &str) -> anyhow::Result<Vec<String>> {
    let mut words = vec![];
    for line in reader(input)?.lines() {
        let line = line.with_context(|| format!("could not read {}", input))?;
        words.extend(line.split_whitespace().map(|w| w.to_string()));
    }
    Ok(words)
}
