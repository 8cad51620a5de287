use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};

use log::{debug, info};

use super::compress_block::compress_block;
use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::bitstream::framing::write_keyed;
use crate::bwt_algorithms::bwt_sort::bwt_encode_with;
use crate::error::{BwtError, Result};
use crate::tools::cli::{BwOpts, Mode, Output};
use crate::tools::mtf::mtf_encode;

/*
    Each input (every named file, or stdin) is read completely and handled as a single block.
    The result is built in memory before the output is opened, so a failed block leaves no
    partial output file behind.
*/

/// Output of one mode, ready to be framed onto the stream.
#[derive(Debug, PartialEq, Eq)]
pub enum Frame {
    /// A BWT key followed by the block bytes
    Keyed(u32, Vec<u8>),
    /// Bytes with no header
    Raw(Vec<u8>),
}

/// Run the forward modes (transform, encode, compress) over the inputs defined in opts.
pub fn compress(opts: &BwOpts) -> Result<()> {
    run_inputs(opts, |source| {
        let block = BitReader::new(source).rest()?;
        forward(opts, &block)
    })
}

/// Apply the forward mode in opts to one block.
pub fn forward(opts: &BwOpts, block: &[u8]) -> Result<Frame> {
    match opts.op_mode {
        Mode::Transform => {
            let (key, bwt) = bwt_encode_with(block, &opts.sort)?;
            Ok(Frame::Keyed(key, bwt))
        }
        Mode::Encode => Ok(Frame::Raw(mtf_encode(block))),
        Mode::Compress => {
            let (key, ranks) = compress_block(block, &opts.sort)?;
            Ok(Frame::Keyed(key, ranks))
        }
        other => Err(BwtError::InvalidInput(format!(
            "{} is not a forward mode",
            other
        ))),
    }
}

/// Feed every input to `op` and write each resulting frame to its output.
pub(crate) fn run_inputs<F>(opts: &BwOpts, mut op: F) -> Result<()>
where
    F: FnMut(Box<dyn Read>) -> Result<Frame>,
{
    if opts.files.is_empty() {
        info!("Processing stdin.");
        return run_stream(Box::new(io::stdin()), Box::new(io::stdout()), &mut op);
    }

    for name in &opts.files {
        let fin = File::open(name)?;
        let frame = op(Box::new(fin))?;

        let writer: Box<dyn Write + Send + Sync> = match opts.output {
            Output::Stdout => Box::new(io::stdout()),
            Output::File => {
                let out_name = output_name(name, opts.op_mode);
                info!("Writing {} to {}.", name, out_name);
                Box::new(create_output(&out_name, opts.force_overwrite)?)
            }
        };
        write_frame(writer, &frame)?;
    }
    Ok(())
}

/// Feed one open stream to `op` and write the frame to `sink`. This is the stdin path.
pub(crate) fn run_stream<F>(
    source: Box<dyn Read>,
    sink: Box<dyn Write + Send + Sync>,
    op: &mut F,
) -> Result<()>
where
    F: FnMut(Box<dyn Read>) -> Result<Frame>,
{
    let frame = op(source)?;
    write_frame(sink, &frame)
}

/// Write one frame through a BitWriter and flush it.
fn write_frame(writer: Box<dyn Write + Send + Sync>, frame: &Frame) -> Result<()> {
    let mut bw = BitWriter::new(writer);
    match frame {
        Frame::Keyed(key, data) => write_keyed(&mut bw, *key, data),
        Frame::Raw(data) => bw.out_bytes(data),
    }
    debug!("Bit stream at {} before flush.", bw.loc());
    bw.flush()?;
    Ok(())
}

/// Name of the file written for input `name`. Forward modes append the mode's extension;
/// reverse modes strip it, or append ".out" when it is missing.
pub fn output_name(name: &str, mode: Mode) -> String {
    let ext = format!(".{}", mode.extension());
    if !mode.is_reverse() {
        return format!("{}{}", name, ext);
    }
    match name.strip_suffix(&ext) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => format!("{}.out", name),
    }
}

/// Open an output file, refusing to replace an existing one unless forced.
fn create_output(name: &str, force: bool) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    options.open(name)
}

#[cfg(test)]
mod test {
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::compression::decompress::reverse;

    #[derive(Clone, Default)]
    struct Sink(Arc<Mutex<Vec<u8>>>);

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Push `input` through the stream path in `mode`, the way stdin is handled.
    fn stream(mode: Mode, input: &[u8]) -> Result<Vec<u8>> {
        let options = opts(mode);
        let sink = Sink::default();
        let source = Box::new(Cursor::new(input.to_vec()));
        if mode.is_reverse() {
            let mut op = |source: Box<dyn Read>| -> Result<Frame> {
                reverse(options.op_mode, &mut BitReader::new(source))
            };
            run_stream(source, Box::new(sink.clone()), &mut op)?;
        } else {
            let mut op = |source: Box<dyn Read>| -> Result<Frame> {
                forward(&options, &BitReader::new(source).rest()?)
            };
            run_stream(source, Box::new(sink.clone()), &mut op)?;
        }
        let out = sink.0.lock().unwrap().clone();
        Ok(out)
    }

    fn opts(mode: Mode) -> BwOpts {
        let mut opts = BwOpts::new();
        opts.op_mode = mode;
        opts
    }

    #[test]
    fn output_name_test() {
        assert_eq!(output_name("a.txt", Mode::Transform), "a.txt.bwt");
        assert_eq!(output_name("a.txt", Mode::Encode), "a.txt.mtf");
        assert_eq!(output_name("a.txt", Mode::Compress), "a.txt.bsz");
        assert_eq!(output_name("a.txt.bwt", Mode::Inverse), "a.txt");
        assert_eq!(output_name("a.txt.bsz", Mode::Decompress), "a.txt");
        assert_eq!(output_name("a.txt", Mode::Decode), "a.txt.out");
        assert_eq!(output_name(".mtf", Mode::Decode), ".mtf.out");
    }

    #[test]
    fn forward_modes_test() {
        assert_eq!(
            forward(&opts(Mode::Transform), b"ABRACADABRA!").unwrap(),
            Frame::Keyed(3, b"ARD!RCAAAABB".to_vec())
        );
        assert_eq!(
            forward(&opts(Mode::Encode), &[65, 65, 65, 66]).unwrap(),
            Frame::Raw(vec![65, 0, 0, 66])
        );
        assert!(matches!(
            forward(&opts(Mode::Compress), b"").unwrap_err(),
            BwtError::InvalidInput(_)
        ));
        assert!(forward(&opts(Mode::Inverse), b"abc").is_err());
    }

    #[test]
    fn stream_transform_test() {
        let out = stream(Mode::Transform, b"ABRACADABRA!").unwrap();
        assert_eq!(out, [&[0_u8, 0, 0, 3][..], &b"ARD!RCAAAABB"[..]].concat());
        assert_eq!(stream(Mode::Inverse, &out).unwrap(), b"ABRACADABRA!");
    }

    #[test]
    fn stream_round_trip_test() {
        let text = b"If Peter Piper picked a peck of pickled peppers, where's the peck of pickled peppers Peter Piper picked?????";
        for (forward_mode, reverse_mode) in [
            (Mode::Compress, Mode::Decompress),
            (Mode::Encode, Mode::Decode),
        ] {
            let packed = stream(forward_mode, text).unwrap();
            assert_eq!(stream(reverse_mode, &packed).unwrap(), text.to_vec());
        }
    }

    #[test]
    fn stream_errors_test() {
        assert!(matches!(
            stream(Mode::Compress, b""),
            Err(BwtError::InvalidInput(_))
        ));
        assert!(matches!(
            stream(Mode::Decompress, &[0, 0]),
            Err(BwtError::InvalidInput(_))
        ));
    }
}
