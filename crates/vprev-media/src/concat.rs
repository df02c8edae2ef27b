//! Stream-copy concatenation through the concat demuxer.

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::codec::CodecService;
use crate::command::FfmpegCommand;
use crate::error::MediaResult;

/// Render a concat list. Paths are absolutized since the demuxer resolves
/// relative entries against the list file's own directory.
pub fn concat_list<P: AsRef<Path>>(segments: &[P]) -> MediaResult<String> {
    let mut list = String::new();
    for segment in segments {
        let path: PathBuf = std::path::absolute(segment.as_ref())?;
        let escaped = path.to_string_lossy().replace('\'', r"'\''");
        list.push_str(&format!("file '{}'\n", escaped));
    }
    Ok(list)
}

/// Join `segments` in order into `output` without re-encoding.
///
/// The list file is removed when this returns, whatever the outcome.
pub async fn merge<C, P>(codec: &C, segments: &[P], output: &Path) -> MediaResult<()>
where
    C: CodecService + ?Sized,
    P: AsRef<Path>,
{
    let mut list_file = tempfile::Builder::new()
        .prefix("vprev-concat-")
        .suffix(".txt")
        .tempfile()?;
    write_list(&mut list_file, segments)?;

    let cmd = FfmpegCommand::new(list_file.path(), output)
        .concat_demuxer()
        .codec_copy();

    codec.run(&cmd).await
}

fn write_list<P: AsRef<Path>>(file: &mut NamedTempFile, segments: &[P]) -> MediaResult<()> {
    file.write_all(concat_list(segments)?.as_bytes())?;
    file.flush()?;
    Ok(())
}
