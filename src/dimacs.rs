use std::fmt;
use std::fs;
use std::io;

use nom::IResult;
use nom::character::complete::{alpha1, char, digit1, space0, space1};
use nom::combinator::map_res;
use nom::sequence::{preceded, separated_pair, terminated, tuple};

use crate::color::Graph;


/** reasons for rejecting a DIMACS file */
#[derive(Debug)]
pub enum DimacsError {
    /// the file can not be read
    Io(io::Error),
    /// no "p" line in the file
    MissingProblemLine,
    /// the problem line declares no vertex
    InvalidVertexCount,
    /// line number of an edge appearing before the problem line
    EdgeBeforeProblemLine(usize),
    /// (line number, u, v): edge with an endpoint outside 1..=n
    VertexOutOfRange(usize, usize, usize),
    /// line number of a line that can not be parsed
    Malformed(usize),
}

impl fmt::Display for DimacsError {
    fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimacsError::Io(e) => write!(f, "unable to read the instance: {}", e),
            DimacsError::MissingProblemLine => write!(f, "missing problem line"),
            DimacsError::InvalidVertexCount => write!(f, "invalid vertex count"),
            DimacsError::EdgeBeforeProblemLine(l) =>
                write!(f, "line {}: edge before the problem line", l),
            DimacsError::VertexOutOfRange(l, u, v) =>
                write!(f, "line {}: edge ({},{}) references an out-of-range vertex", l, u, v),
            DimacsError::Malformed(l) => write!(f, "line {}: malformed line", l),
        }
    }
}

impl std::error::Error for DimacsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DimacsError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DimacsError {
    fn from(e:io::Error) -> Self { DimacsError::Io(e) }
}


/// reads an instance from a file
pub fn read_from_file(filename:&str) -> Result<Graph, DimacsError> {
    let content = fs::read_to_string(filename)?;
    read_from_str(content.as_str())
}

/** reads an instance in the DIMACS format (WARNING: indices start at 1 in the DIMACS format).
Comment lines (starting by c, % or #), empty and unknown lines are skipped.
Self-loops and duplicated edges are ignored.
*/
pub fn read_from_str(content:&str) -> Result<Graph, DimacsError> {
    let mut n:Option<usize> = None;
    let mut edges = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let line_number = i+1;
        let line = line.trim();
        match line.chars().next() {
            None | Some('c') | Some('%') | Some('#') => {},
            Some('p') => {
                let (_,(nb_vertices,_)) = read_header(line)
                    .map_err(|_| DimacsError::Malformed(line_number))?;
                if nb_vertices == 0 { return Err(DimacsError::InvalidVertexCount); }
                n = Some(nb_vertices);
            },
            Some('e') => {
                let nb_vertices = n.ok_or(DimacsError::EdgeBeforeProblemLine(line_number))?;
                let (_,(a,b)) = read_edge(line)
                    .map_err(|_| DimacsError::Malformed(line_number))?;
                if a == 0 || b == 0 || a > nb_vertices || b > nb_vertices {
                    return Err(DimacsError::VertexOutOfRange(line_number, a, b));
                }
                edges.push((a-1, b-1));
            },
            Some(_) => {},
        }
    }
    match n {
        None => Err(DimacsError::MissingProblemLine),
        Some(n) => Ok(Graph::from_edges(n, &edges)),
    }
}

/// reads a non-negative integer
fn read_integer(s:&str) -> IResult<&str, usize> {
    map_res(digit1, |d:&str| d.parse::<usize>())(s)
}

/// reads two numbers separated by spaces
fn read_two_integers(s:&str) -> IResult<&str, (usize,usize)> {
    terminated(separated_pair(read_integer, space1, read_integer), space0)(s)
}

/// reads header containing (n,m), e.g. "p edge 4 5" or "p col 4 5"
pub fn read_header(s:&str) -> IResult<&str, (usize,usize)> {
    preceded(tuple((char('p'), space1, alpha1, space1)), read_two_integers)(s)
}

/// reads edge line, e.g. "e 1 2"
pub fn read_edge(s:&str) -> IResult<&str, (usize,usize)> {
    preceded(tuple((char('e'), space1)), read_two_integers)(s)
}


/** writes a string encoding the solution (one line per color) */
pub fn solution_to_string(solution:&[Vec<usize>]) -> String {
    let mut res = String::default();
    for e in solution {
        for v in e {
            res += format!("{} ", v).as_str();
        }
        res += "\n";
    }
    res
}

/** writes a solution into a file. each line corresponds to a color. */
pub fn write_solution(filename:&str, solution:&[Vec<usize>]) -> io::Result<()> {
    fs::write(filename, solution_to_string(solution))
}


#[cfg(test)]
mod tests {
    use super::*;

    use crate::color::ColoringInstance;

    const GRID2X2:&str = "c grid 2x2\nc second comment\np edge 4 4\ne 1 2\ne 1 3\ne 2 4\ne 3 4\n";

    #[test]
    fn test_read_instance() {
        let inst = read_from_str(GRID2X2).unwrap();
        assert_eq!(inst.nb_vertices(), 4);
        assert_eq!(inst.nb_edges(), 4);
        assert_eq!(inst.neighbors(0), &[1,2]);
    }

    #[test]
    fn test_read_header() {
        let s = "p edge 2 1";
        assert_eq!(read_header(s).unwrap().1, (2,1));
        assert_eq!(read_header("p col 12 30 ").unwrap().1, (12,30));
        assert!(read_header("p edge x 1").is_err());
    }

    #[test]
    fn test_read_edge() {
        let s = "e 1 2";
        assert_eq!(read_edge(s).unwrap().1, (1,2));
        assert_eq!(read_edge(s).unwrap().0, "");
        assert!(read_edge("e 1").is_err());
    }

    #[test]
    fn test_loops_duplicates_and_other_comments() {
        let s = "% matrix market style\n# hash\np edges 3 4\ne 1 2\ne 2 1\ne 2 2\r\ne 2 3\n\n";
        let inst = read_from_str(s).unwrap();
        assert_eq!(inst.nb_vertices(), 3);
        assert_eq!(inst.nb_edges(), 2);
    }

    #[test]
    fn test_rejections() {
        assert!(matches!(read_from_str("c nothing\n"), Err(DimacsError::MissingProblemLine)));
        assert!(matches!(read_from_str("p edge 0 0\n"), Err(DimacsError::InvalidVertexCount)));
        assert!(matches!(
            read_from_str("e 1 2\np edge 2 1\n"),
            Err(DimacsError::EdgeBeforeProblemLine(1))
        ));
        assert!(matches!(
            read_from_str("p edge 2 1\ne 1 3\n"),
            Err(DimacsError::VertexOutOfRange(2, 1, 3))
        ));
        assert!(matches!(read_from_str("p edge 2 1\ne 1 b\n"), Err(DimacsError::Malformed(2))));
        assert!(matches!(read_from_file("does/not/exist.col"), Err(DimacsError::Io(_))));
    }

    #[test]
    fn test_solution_to_string() {
        assert_eq!(solution_to_string(&[vec![0,2], vec![1]]), "0 2 \n1 \n");
    }
}
