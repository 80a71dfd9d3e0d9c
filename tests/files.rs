use pseudo9608::{error::Error, interpreter::io::MemoryIo, run_source_with_io};

fn run_io(src: &str, io: &mut MemoryIo) {
    if let Err(e) = run_source_with_io(src, io) {
        panic!("Script failed: {e}");
    }
}

#[test]
fn copies_a_file_substituting_blank_lines() {
    let src = "DECLARE Line : STRING\n\
               OPENFILE FileA.txt FOR READ\n\
               OPENFILE FileB.txt FOR WRITE\n\
               WHILE NOT EOF(\"FileA.txt\") DO\n\
                 READFILE FileA.txt, Line\n\
                 IF Line = \"\"\n\
                   THEN\n\
                     WRITEFILE FileB.txt, \"-------------------------\"\n\
                   ELSE\n\
                     WRITEFILE FileB.txt, Line\n\
                 ENDIF\n\
               ENDWHILE\n\
               CLOSEFILE FileA.txt\n\
               CLOSEFILE FileB.txt\n";
    let mut io = MemoryIo::new();
    io.set_file("FileA.txt", "one\n\ntwo\n");
    run_io(src, &mut io);
    assert_eq!(io.file("FileB.txt").unwrap(),
               &["one".to_string(),
                 "-------------------------".to_string(),
                 "two".to_string()]);
}

#[test]
fn eof_is_false_with_lines_remaining() {
    let src = "OPENFILE \"testfile.txt\" FOR READ\n\
               OUTPUT EOF(\"testfile.txt\")\n\
               CLOSEFILE \"testfile.txt\"\n";
    let mut io = MemoryIo::new();
    io.set_file("testfile.txt", "0\n1\n2\n");
    run_io(src, &mut io);
    assert_eq!(io.output(), "FALSE\n");
}

#[test]
fn eof_becomes_true_after_the_last_line() {
    let src = "DECLARE Line : STRING\n\
               OPENFILE \"one.txt\" FOR READ\n\
               READFILE \"one.txt\", Line\n\
               OUTPUT EOF(\"one.txt\")\n\
               CLOSEFILE \"one.txt\"\n";
    let mut io = MemoryIo::new();
    io.set_file("one.txt", "only\n");
    run_io(src, &mut io);
    assert_eq!(io.output(), "TRUE\n");
}

#[test]
fn write_then_read_back() {
    let src = "DECLARE Line : STRING\n\
               OPENFILE \"out.txt\" FOR WRITE\n\
               WRITEFILE \"out.txt\", \"alpha\"\n\
               WRITEFILE \"out.txt\", 42\n\
               CLOSEFILE \"out.txt\"\n\
               OPENFILE \"out.txt\" FOR READ\n\
               READFILE \"out.txt\", Line\n\
               OUTPUT Line\n\
               CLOSEFILE \"out.txt\"\n";
    let mut io = MemoryIo::new();
    run_io(src, &mut io);
    assert_eq!(io.output(), "alpha\n");
    assert_eq!(io.file("out.txt").unwrap(),
               &["alpha".to_string(), "42".to_string()]);
}

#[test]
fn append_keeps_existing_lines() {
    let src = "OPENFILE \"log.txt\" FOR APPEND\n\
               WRITEFILE \"log.txt\", \"second\"\n\
               CLOSEFILE \"log.txt\"\n";
    let mut io = MemoryIo::new();
    io.set_file("log.txt", "first\n");
    run_io(src, &mut io);
    assert_eq!(io.file("log.txt").unwrap(),
               &["first".to_string(), "second".to_string()]);
}

#[test]
fn readfile_coerces_into_the_target_type() {
    let src = "DECLARE N : INTEGER\n\
               DECLARE Total : INTEGER\n\
               Total <- 0\n\
               OPENFILE \"nums.txt\" FOR READ\n\
               WHILE NOT EOF(\"nums.txt\") DO\n\
                 READFILE \"nums.txt\", N\n\
                 Total <- Total + N\n\
               ENDWHILE\n\
               CLOSEFILE \"nums.txt\"\n\
               OUTPUT Total\n";
    let mut io = MemoryIo::new();
    io.set_file("nums.txt", "1\n2\n3\n");
    run_io(src, &mut io);
    assert_eq!(io.output(), "6\n");
}

fn run_file_err(src: &str, io: &mut MemoryIo) -> Error {
    match run_source_with_io(src, io) {
        Ok(()) => panic!("Script succeeded but was expected to fail"),
        Err(e) => e,
    }
}

#[test]
fn opening_an_open_file_is_a_runtime_error() {
    let src = "OPENFILE \"a.txt\" FOR WRITE\n\
               OPENFILE \"a.txt\" FOR READ\n";
    let err = run_file_err(src, &mut MemoryIo::new());
    assert!(matches!(err, Error::Runtime(_)));
}

#[test]
fn touching_an_unopened_file_is_a_runtime_error() {
    let src = "DECLARE Line : STRING\n\
               READFILE \"ghost.txt\", Line\n";
    let err = run_file_err(src, &mut MemoryIo::new());
    assert!(matches!(err, Error::Runtime(_)));
}

#[test]
fn writing_to_a_read_mode_file_is_a_runtime_error() {
    let src = "OPENFILE \"a.txt\" FOR READ\n\
               WRITEFILE \"a.txt\", \"oops\"\n";
    let mut io = MemoryIo::new();
    io.set_file("a.txt", "content\n");
    let err = run_file_err(src, &mut io);
    assert!(matches!(err, Error::Runtime(_)));
}

#[test]
fn reading_past_end_of_file_is_a_runtime_error() {
    let src = "DECLARE Line : STRING\n\
               OPENFILE \"a.txt\" FOR READ\n\
               READFILE \"a.txt\", Line\n\
               READFILE \"a.txt\", Line\n";
    let mut io = MemoryIo::new();
    io.set_file("a.txt", "only\n");
    let err = run_file_err(src, &mut io);
    assert!(matches!(err, Error::Runtime(_)));
}

#[test]
fn opening_a_missing_file_for_read_fails() {
    let src = "OPENFILE \"missing.txt\" FOR READ\n";
    let err = run_file_err(src, &mut MemoryIo::new());
    assert!(matches!(err, Error::Runtime(_)));
}
