/// Dataset locations of a 10x matrix group.
///
/// CellRanger v3+ writes the matrix under `/matrix` with a `features` subgroup;
/// v2 writes one group per genome with `genes`/`gene_names` datasets. Both keep
/// `data`, `indices`, `indptr`, `shape` and `barcodes` directly under the group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TenxLayout {
    prefix: String,
}

impl TenxLayout {
    /// `group` may be a group name (`"matrix"`), an absolute path (`"/matrix"`), or
    /// empty for datasets at the file root.
    pub fn new(group: &str) -> TenxLayout {
        let trimmed = group.trim_matches('/');
        let prefix = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{trimmed}/")
        };
        TenxLayout { prefix }
    }

    /// Absolute path of `name` inside the group
    pub fn path(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }

    /// Group path without trailing slash
    pub fn group(&self) -> &str {
        if self.prefix == "/" {
            "/"
        } else {
            self.prefix.trim_end_matches('/')
        }
    }

    pub fn data(&self) -> String {
        self.path("data")
    }

    pub fn indices(&self) -> String {
        self.path("indices")
    }

    pub fn indptr(&self) -> String {
        self.path("indptr")
    }

    pub fn shape(&self) -> String {
        self.path("shape")
    }

    pub fn barcodes(&self) -> String {
        self.path("barcodes")
    }

    pub fn feature_ids(&self) -> String {
        self.path("features/id")
    }

    pub fn feature_names(&self) -> String {
        self.path("features/name")
    }

    pub fn feature_types(&self) -> String {
        self.path("features/feature_type")
    }

    pub fn gene_ids(&self) -> String {
        self.path("genes")
    }

    pub fn gene_names(&self) -> String {
        self.path("gene_names")
    }
}
