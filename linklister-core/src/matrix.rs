// Link adjacency matrix over the crawled pages

use linklister_scanner::PageLinkMap;
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

/// Cell value for "row links to column".
pub const PRESENCE_MARKER: &str = "X";

/// Square presence table over every seed and every discovered link.
///
/// Rows and columns share one label order: seeds as the feed listed them,
/// then discovered links in the order they were first seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    labels: Vec<String>,
    cells: Vec<Vec<bool>>,
}

impl AdjacencyMatrix {
    pub fn build(pages: &PageLinkMap, seeds: &[String]) -> Self {
        let mut labels: Vec<String> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        let discovered = pages.pages().iter().flat_map(|page| page.links.iter());
        for url in seeds.iter().chain(discovered) {
            if seen.insert(url.as_str()) {
                labels.push(url.clone());
            }
        }

        // Leaf pages that were never crawled have no entry and an empty row
        let cells = labels
            .iter()
            .map(|row| match pages.links_of(row) {
                Some(links) => labels.iter().map(|col| links.contains(col)).collect(),
                None => vec![false; labels.len()],
            })
            .collect();

        Self { labels, cells }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn has_link(&self, from: &str, to: &str) -> bool {
        let row = self.labels.iter().position(|l| l == from);
        let col = self.labels.iter().position(|l| l == to);
        match (row, col) {
            (Some(row), Some(col)) => self.cells[row][col],
            _ => false,
        }
    }

    pub fn link_count(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|cell| **cell).count())
            .sum()
    }

    /// Rows in label order with their cell values.
    pub fn rows(&self) -> impl Iterator<Item = (&str, Vec<&'static str>)> + '_ {
        self.labels.iter().zip(&self.cells).map(|(label, row)| {
            let cells = row
                .iter()
                .map(|&linked| if linked { PRESENCE_MARKER } else { "" })
                .collect();
            (label.as_str(), cells)
        })
    }

    /// Header `["", url_1, ..]`, then `[row_url, cell_1, ..]` per label.
    pub fn write_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(std::iter::once("").chain(self.labels.iter().map(String::as_str)))?;
        for (label, cells) in self.rows() {
            csv_writer.write_record(std::iter::once(label).chain(cells))?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> csv::Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linklister_scanner::PageLinks;

    fn page(url: &str, links: &[&str]) -> PageLinks {
        let mut page = PageLinks::new(url.to_string());
        page.links = links.iter().map(|l| l.to_string()).collect();
        page
    }

    fn csv_of(matrix: &AdjacencyMatrix) -> String {
        let mut out = Vec::new();
        matrix.write_csv(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_empty_matrix() {
        let matrix = AdjacencyMatrix::build(&PageLinkMap::new(), &[]);
        assert!(matrix.is_empty());
        assert_eq!(matrix.link_count(), 0);
    }

    #[test]
    fn test_duplicate_seeds_appear_once() {
        let seeds = vec!["https://a.test/blog/a".to_string(); 2];
        let pages: PageLinkMap = vec![page("https://a.test/blog/a", &[])].into_iter().collect();

        let matrix = AdjacencyMatrix::build(&pages, &seeds);
        assert_eq!(matrix.len(), 1);
    }

    #[test]
    fn test_label_order_seeds_then_discovered() {
        let seeds = vec!["s1".to_string(), "s2".to_string()];
        let pages: PageLinkMap = vec![page("s1", &["z", "s2"]), page("s2", &["a"])]
            .into_iter()
            .collect();

        let matrix = AdjacencyMatrix::build(&pages, &seeds);
        assert_eq!(matrix.labels(), ["s1", "s2", "z", "a"]);
    }

    #[test]
    fn test_uncrawled_rows_are_empty() {
        let seeds = vec!["s1".to_string()];
        let pages: PageLinkMap = vec![page("s1", &["leaf"])].into_iter().collect();

        let matrix = AdjacencyMatrix::build(&pages, &seeds);
        let rows: Vec<_> = matrix.rows().collect();

        assert_eq!(rows[0], ("s1", vec!["", "X"]));
        assert_eq!(rows[1], ("leaf", vec!["", ""]));
        assert_eq!(matrix.link_count(), 1);
        assert!(matrix.has_link("s1", "leaf"));
        assert!(!matrix.has_link("leaf", "s1"));
    }

    #[test]
    fn test_csv_quotes_labels_with_commas() {
        let seeds = vec!["https://a.test/blog/a?x=1,2".to_string()];
        let pages: PageLinkMap = vec![page("https://a.test/blog/a?x=1,2", &[])]
            .into_iter()
            .collect();

        let csv = csv_of(&AdjacencyMatrix::build(&pages, &seeds));
        assert_eq!(
            csv,
            ",\"https://a.test/blog/a?x=1,2\"\n\"https://a.test/blog/a?x=1,2\",\n"
        );
    }
}
