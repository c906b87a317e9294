use crate::error::MatrixError;
use serde::{Deserialize, Serialize};

/// Per-row annotation of a 10x feature-barcode matrix.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TenxFeatures {
    pub ids: Vec<String>,
    pub names: Vec<String>,
    pub feature_types: Vec<String>,
}

impl TenxFeatures {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Indices of the features whose type is `feature_type`, e.g. "Gene Expression".
    pub fn indices_of_type(&self, feature_type: &str) -> Vec<usize> {
        self.feature_types
            .iter()
            .enumerate()
            .filter(|(_, t)| t.as_str() == feature_type)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Row and column names of a matrix; either may be absent from the file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixDimnames {
    /// Feature ids
    pub row_names: Option<Vec<String>>,
    /// Cell barcodes
    pub col_names: Option<Vec<String>>,
}

impl MatrixDimnames {
    /// Check the names against the matrix shape.
    pub fn checked(
        row_names: Option<Vec<String>>,
        col_names: Option<Vec<String>>,
        shape: [usize; 2],
    ) -> Result<MatrixDimnames, MatrixError> {
        for (what, names, len) in [("row", &row_names, shape[0]), ("column", &col_names, shape[1])] {
            if let Some(names) = names {
                if names.len() != len {
                    return Err(MatrixError::format(format!(
                        "{} {what} names for dimension of length {len}",
                        names.len()
                    )));
                }
            }
        }
        Ok(MatrixDimnames { row_names, col_names })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(std::string::ToString::to_string).collect()
    }

    #[test]
    fn test_checked() {
        let ok = MatrixDimnames::checked(Some(strings(&["g1", "g2"])), None, [2, 5]).unwrap();
        assert_eq!(ok.row_names.unwrap().len(), 2);
        assert!(ok.col_names.is_none());

        let bad = MatrixDimnames::checked(None, Some(strings(&["AAAC-1"])), [2, 5]);
        assert!(bad.unwrap_err().is_format());
    }

    #[test]
    fn test_indices_of_type() {
        let f = TenxFeatures {
            ids: strings(&["a", "b", "c"]),
            names: strings(&["A", "B", "C"]),
            feature_types: strings(&["Gene Expression", "Antibody Capture", "Gene Expression"]),
        };
        assert_eq!(f.indices_of_type("Gene Expression"), vec![0, 2]);
        assert!(f.indices_of_type("CRISPR Guide Capture").is_empty());
    }
}
