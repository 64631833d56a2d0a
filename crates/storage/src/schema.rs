//! Table Definitions

/// `reports` table for MySQL
pub(crate) const MYSQL_REPORTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS reports (
    id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
    report_name LONGTEXT NOT NULL,
    report_content LONGTEXT NOT NULL
)
"#;

/// `reports` table for SQLite; AUTOINCREMENT keeps ids from being reused
pub(crate) const SQLITE_REPORTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS reports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    report_name TEXT NOT NULL,
    report_content TEXT NOT NULL
)
"#;

pub(crate) const SELECT_SUMMARIES: &str = "SELECT id, report_name FROM reports ORDER BY id";
pub(crate) const SELECT_REPORT: &str =
    "SELECT id, report_name, report_content FROM reports WHERE id = ?";
pub(crate) const INSERT_REPORT: &str =
    "INSERT INTO reports (report_name, report_content) VALUES (?, ?)";
pub(crate) const UPDATE_REPORT: &str =
    "UPDATE reports SET report_name = ?, report_content = ? WHERE id = ?";
pub(crate) const DELETE_REPORT: &str = "DELETE FROM reports WHERE id = ?";
pub(crate) const REPORT_EXISTS: &str = "SELECT 1 FROM reports WHERE id = ?";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_columns_are_unbounded_text() {
        assert!(!MYSQL_REPORTS_TABLE.contains("VARCHAR"));
        assert!(MYSQL_REPORTS_TABLE.contains("report_name LONGTEXT NOT NULL"));
        assert!(MYSQL_REPORTS_TABLE.contains("report_content LONGTEXT NOT NULL"));
        assert!(SQLITE_REPORTS_TABLE.contains("report_name TEXT NOT NULL"));
    }
}
