use super::*;

fn shortvec(len: usize) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.write_shortvec_len(b"len", len).unwrap();
    buf
}

#[test]
fn shortvec_vectors() {
    assert_eq!(hex::encode(shortvec(0)), "00");
    assert_eq!(hex::encode(shortvec(5)), "05");
    assert_eq!(hex::encode(shortvec(0x7f)), "7f");
    assert_eq!(hex::encode(shortvec(0x80)), "8001");
    assert_eq!(hex::encode(shortvec(0xff)), "ff01");
    assert_eq!(hex::encode(shortvec(0x100)), "8002");
    assert_eq!(hex::encode(shortvec(0x3fff)), "ff7f");
    assert_eq!(hex::encode(shortvec(0x4000)), "808001");
    assert_eq!(hex::encode(shortvec(0xffff)), "ffff03");
}

#[test]
fn shortvec_lengths_match_encoder() {
    for len in &[0usize, 1, 127, 128, 300, 16383, 16384, 65535] {
        assert_eq!(shortvec(*len).len(), shortvec_encoded_length(*len));
        let bytes = shortvec(*len);
        let mut r = &bytes[..];
        assert_eq!(r.read_shortvec_len().unwrap(), *len);
        assert_eq!(r.remaining_bytes(), 0);
    }
}

#[test]
fn shortvec_rejects_overflow() {
    let mut buf = Vec::new();
    assert_eq!(
        buf.write_shortvec_len(b"len", 0x10000),
        Err(WriteError::LengthOverflow(0x10000))
    );

    let mut r = &[0xff, 0xff, 0x04][..];
    assert_eq!(r.read_shortvec_len(), Err(ReadError::InvalidLength));

    let mut r = &[0x80, 0x80, 0x80, 0x01][..];
    assert_eq!(r.read_shortvec_len(), Err(ReadError::InvalidLength));
}

#[test]
fn shortvec_rejects_alias_encoding() {
    let mut r = &[0x80, 0x00][..];
    assert_eq!(r.read_shortvec_len(), Err(ReadError::InvalidLength));
}

#[test]
fn shortvec_truncated_input() {
    let mut r = &[0x80][..];
    assert_eq!(r.read_shortvec_len(), Err(ReadError::InsufficientBytes));
}

#[test]
fn slice_writer_capacity() {
    let mut storage = [0u8; 3];
    let mut w = &mut storage[..];
    w.write_u8(b"a", 1).unwrap();
    assert_eq!(
        w.write_u32(b"b", 7),
        Err(WriteError::InsufficientCapacity)
    );
    w.write(b"c", &[2, 3]).unwrap();
    assert_eq!(w.remaining_capacity(), 0);
    assert_eq!(storage, [1, 2, 3]);
}

#[test]
fn slice_reader_parse_rejects_trailing_bytes() {
    let data = [1u8, 2, 3];
    let res: Result<u8, ReadError> = SliceReader::parse(&data, |r| r.read_u8());
    assert_eq!(res, Err(ReadError::TrailingBytes));

    let res: Result<u8, ReadError> = SliceReader::parse(&data, |r| {
        let x = r.read_u8()?;
        r.skip_trailing_bytes();
        Ok(x)
    });
    assert_eq!(res, Ok(1));
}

#[test]
fn slice_reader_reports_consumed_bytes() {
    let data = [9u8, 1, 0, 0, 0, 5];
    let mut reader = SliceReader::new(&data);
    reader.read_u8().unwrap();
    let (x, consumed) = reader
        .slice(|r| r.read_u32())
        .unwrap();
    assert_eq!(x, 1);
    assert_eq!(consumed, &[1, 0, 0, 0]);
    assert_eq!(reader.remaining_bytes(), 1);
}

#[test]
fn little_endian_integers() {
    let mut buf = Vec::new();
    buf.write_u32(b"x", 0x0102_0304).unwrap();
    buf.write_u64(b"y", 500_000).unwrap();
    assert_eq!(hex::encode(&buf), "0403020120a1070000000000");

    let mut r = &buf[..];
    assert_eq!(r.read_u32().unwrap(), 0x0102_0304);
    assert_eq!(r.read_u64().unwrap(), 500_000);
    assert_eq!(r.read_u8(), Err(ReadError::InsufficientBytes));
}
