use std::fmt::Display;
use std::io::{self, BufRead, BufReader, ErrorKind, Lines, Read, Write};
use tracing::instrument;

/// The console a player sits at, one line per message.
#[derive(Debug)]
pub struct Io<W: Write, R: Read> {
    writer: W,
    reader: Lines<BufReader<R>>,
}

impl<W: Write, R: Read> Io<W, R> {
    pub fn new(writer: W, reader: R) -> Self {
        Io {
            writer,
            reader: BufReader::new(reader).lines(),
        }
    }

    /// Reads the next non-blank line, trimmed.
    #[instrument(level = "trace", skip(self), ret, err)]
    pub fn recv(&mut self) -> io::Result<String> {
        loop {
            let line = self.reader.next().ok_or(ErrorKind::UnexpectedEof)??;
            if !line.trim().is_empty() {
                break Ok(line.trim().to_string());
            }
        }
    }

    /// Writes a line.
    #[instrument(level = "trace", skip(self, msg), err, fields(%msg))]
    pub fn send<T: Display>(&mut self, msg: T) -> io::Result<()> {
        writeln!(&mut self.writer, "{}", msg)
    }

    /// Writes a prompt and waits for the answer.
    pub fn ask<T: Display>(&mut self, prompt: T) -> io::Result<String> {
        write!(&mut self.writer, "{prompt} > ")?;
        self.writer.flush()?;
        self.recv()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::VecDeque, io::empty, str};
    use test_strategy::proptest;

    #[proptest]
    fn recv_returns_the_trimmed_line(#[strategy("[a-h1-8]+")] s: String) {
        let mut buf = VecDeque::new();
        writeln!(&mut buf, "  {}\t", s)?;
        let mut io = Io::new(empty(), &mut buf);
        assert_eq!(io.recv()?, s);
    }

    #[test]
    fn recv_skips_blank_lines() {
        let mut buf = VecDeque::from(b"\n  \naccept\n".to_vec());
        let mut io = Io::new(empty(), &mut buf);
        assert_eq!(io.recv().unwrap(), "accept");
    }

    #[test]
    fn recv_fails_at_end_of_input() {
        let mut io = Io::new(empty(), empty());
        assert_eq!(io.recv().map_err(|e| e.kind()), Err(ErrorKind::UnexpectedEof));
    }

    #[proptest]
    fn send_appends_line_break(s: String) {
        let mut buf = Vec::new();
        let mut io = Io::new(&mut buf, empty());
        io.send(&s)?;
        drop(io);
        assert_eq!(str::from_utf8(&buf)?, format!("{s}\n"));
    }

    #[test]
    fn ask_prompts_on_the_same_line() {
        let mut out = Vec::new();
        let mut buf = VecDeque::from(b"e2e4\n".to_vec());
        let mut io = Io::new(&mut out, &mut buf);
        assert_eq!(io.ask("white to move").unwrap(), "e2e4");
        drop(io);
        assert_eq!(str::from_utf8(&out).unwrap(), "white to move > ");
    }
}
