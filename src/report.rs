use std::io::{self, Write};
use std::time::Duration;

/**
receives intermediate colorings produced by a search (one call per notable event).
colors[v] is None while v is still unassigned.
*/
pub trait SnapshotSink {
    /// records a snapshot of the current coloring
    fn snapshot(&mut self, colors:&[Option<usize>]);

    /// records a complete coloring
    fn snapshot_complete(&mut self, coloring:&[usize]) {
        let colors:Vec<Option<usize>> = coloring.iter().map(|c| Some(*c)).collect();
        self.snapshot(&colors);
    }
}

/// discards every snapshot
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSnapshot;

impl SnapshotSink for NoSnapshot {
    fn snapshot(&mut self, _colors:&[Option<usize>]) {}
    fn snapshot_complete(&mut self, _coloring:&[usize]) {}
}

/// keeps every snapshot in memory
impl SnapshotSink for Vec<Vec<Option<usize>>> {
    fn snapshot(&mut self, colors:&[Option<usize>]) { self.push(colors.to_vec()); }
}

/**
writes each snapshot as a line of space-separated colors (-1 for unassigned vertices).
The first I/O error is kept and returned by `finish`, later snapshots are dropped.
*/
#[derive(Debug)]
pub struct SnapshotWriter<W:Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W:Write> SnapshotWriter<W> {
    /// creates a writer over out
    pub fn new(out:W) -> Self { Self { out, error: None } }

    /// flushes the output and returns it (or the first error encountered)
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() { return Err(e); }
        self.out.flush()?;
        Ok(self.out)
    }
}

/// formats a snapshot line (without the trailing newline)
pub fn snapshot_line(colors:&[Option<usize>]) -> String {
    let mut res = String::with_capacity(colors.len()*3);
    for (i,c) in colors.iter().enumerate() {
        if i > 0 { res.push(' '); }
        match c {
            None => res.push_str("-1"),
            Some(c) => res.push_str(c.to_string().as_str()),
        }
    }
    res
}

impl<W:Write> SnapshotSink for SnapshotWriter<W> {
    fn snapshot(&mut self, colors:&[Option<usize>]) {
        if self.error.is_some() { return; }
        if let Err(e) = writeln!(self.out, "{}", snapshot_line(colors)) {
            self.error = Some(e);
        }
    }
}


/// state of the exact search at a given time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressReport {
    /// time since the beginning of the search
    pub elapsed: Duration,
    /// number of search nodes visited so far
    pub nb_nodes: u64,
    /// number of vertices colored in the current partial solution
    pub nb_colored: usize,
    /// number of colors of the best solution found so far
    pub best_nb_colors: usize,
}

/// receives periodic progress reports. Purely observational.
pub trait ProgressSink {
    /// records a progress report
    fn report(&mut self, report:&ProgressReport);
}

/// discards every report
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _report:&ProgressReport) {}
}

/// keeps every report in memory
impl ProgressSink for Vec<ProgressReport> {
    fn report(&mut self, report:&ProgressReport) { self.push(*report); }
}

/// prints reports on the standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn report(&mut self, report:&ProgressReport) {
        println!(
            "time: {:<10.3} nodes: {:<15} colored: {:<10} best: {:<10}",
            report.elapsed.as_secs_f32(), report.nb_nodes, report.nb_colored, report.best_nb_colors
        );
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_line() {
        assert_eq!(snapshot_line(&[Some(0), None, Some(12)]), "0 -1 12");
        assert_eq!(snapshot_line(&[]), "");
    }

    #[test]
    fn test_snapshot_writer() {
        let mut writer = SnapshotWriter::new(Vec::new());
        writer.snapshot(&[Some(1), None]);
        writer.snapshot_complete(&[1, 0]);
        let out = writer.finish().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1 -1\n1 0\n");
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf:&[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    #[test]
    fn test_snapshot_writer_keeps_error() {
        let mut writer = SnapshotWriter::new(FailingWriter);
        writer.snapshot(&[Some(0)]);
        writer.snapshot(&[Some(1)]);
        assert!(writer.finish().is_err());
    }

    #[test]
    fn test_vec_sinks() {
        let mut snapshots:Vec<Vec<Option<usize>>> = Vec::new();
        snapshots.snapshot_complete(&[0, 1]);
        assert_eq!(snapshots, vec![vec![Some(0), Some(1)]]);
        let mut reports:Vec<ProgressReport> = Vec::new();
        reports.report(&ProgressReport {
            elapsed: Duration::from_millis(5), nb_nodes: 3, nb_colored: 2, best_nb_colors: 4
        });
        assert_eq!(reports.len(), 1);
    }
}
