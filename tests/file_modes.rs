use std::fs;

use blocksort::compression::compress::compress;
use blocksort::compression::decompress::decompress;
use blocksort::error::BwtError;
use blocksort::tools::cli::bwopts_from;

const TEXT: &[u8] = b"If Peter Piper picked a peck of pickled peppers, where's the peck of pickled peppers Peter Piper picked?????";

fn run(args: &[&str]) -> Result<(), BwtError> {
    let mut argv = vec!["blocksort"];
    argv.extend_from_slice(args);
    let opts = bwopts_from(argv).unwrap();
    if opts.op_mode.is_reverse() {
        decompress(&opts)
    } else {
        compress(&opts)
    }
}

#[test]
fn compress_then_decompress_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("peter.txt");
    fs::write(&input, TEXT).unwrap();
    let input = input.to_str().unwrap().to_string();
    let input = input.as_str();

    run(&[input]).unwrap();
    let packed = format!("{}.bsz", input);
    let bytes = fs::read(&packed).unwrap();
    assert_eq!(bytes.len(), TEXT.len() + 4);
    assert_eq!(bytes[..4], [0, 0, 0, 24]);

    // Restoring next to the original needs --force
    assert!(run(&["-d", packed.as_str()]).is_err());
    run(&["-d", "-f", packed.as_str()]).unwrap();
    assert_eq!(fs::read(input).unwrap(), TEXT);
}

#[test]
fn transform_and_inverse_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("abra");
    fs::write(&input, b"ABRACADABRA!").unwrap();
    let input = input.to_str().unwrap().to_string();
    let input = input.as_str();

    run(&["-m", "transform", input]).unwrap();
    let bwt = format!("{}.bwt", input);
    assert_eq!(
        fs::read(&bwt).unwrap(),
        [&[0_u8, 0, 0, 3][..], &b"ARD!RCAAAABB"[..]].concat()
    );

    fs::remove_file(input).unwrap();
    run(&["-m", "inverse", bwt.as_str()]).unwrap();
    assert_eq!(fs::read(input).unwrap(), b"ABRACADABRA!");
}

#[test]
fn encode_and_decode_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("aaab");
    fs::write(&input, [65_u8, 65, 65, 66]).unwrap();
    let input = input.to_str().unwrap().to_string();
    let input = input.as_str();

    run(&["--mode", "encode", input]).unwrap();
    let mtf = format!("{}.mtf", input);
    assert_eq!(fs::read(&mtf).unwrap(), vec![65, 0, 0, 66]);

    run(&["--mode", "decode", "-f", mtf.as_str()]).unwrap();
    assert_eq!(fs::read(input).unwrap(), vec![65, 65, 65, 66]);
}

#[test]
fn empty_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty");
    fs::write(&input, b"").unwrap();
    let input = input.to_str().unwrap().to_string();
    let input = input.as_str();

    assert!(matches!(run(&[input]), Err(BwtError::InvalidInput(_))));
    // No partial output is left behind
    assert!(!dir.path().join("empty.bsz").exists());
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nope.txt");
    assert!(matches!(
        run(&[input.to_str().unwrap()]),
        Err(BwtError::Io(_))
    ));
}
