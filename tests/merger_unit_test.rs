//! Document-level merge behaviour through the public merger API.

use sql_insert_merger::merger::{MergedStatement, StatementMerger, DEFAULT_COMMENT};
use sql_insert_merger::parser::locate_statements;

fn merge(sql: &str) -> String {
    StatementMerger::new().merge(sql).text.into_owned()
}

#[test]
fn test_merge_two_statements_with_columns() {
    let sql = "INSERT INTO `t` (a,b) VALUES (1,2);\nINSERT INTO `t` (a,b) VALUES (3,4);\n";
    let out = merge(sql);
    assert_eq!(
        out,
        "\n\n\n\n-- Merged INSERT statements\nINSERT INTO `t` (a,b) VALUES\n(1,2),\n(3,4);\n"
    );
}

#[test]
fn test_merge_n_statements_in_document_order() {
    let mut sql = String::from("-- dump header\nCREATE TABLE `users` (`id` INT, `name` TEXT);\n");
    for i in 0..50 {
        sql.push_str(&format!(
            "INSERT INTO `users` (`id`, `name`) VALUES ({}, 'user{}');\n",
            i, i
        ));
    }

    let out = StatementMerger::new().merge(&sql);
    assert_eq!(out.statements, 50);
    assert_eq!(out.table, Some("users"));

    let expected_rows: Vec<String> = (0..50).map(|i| format!("({}, 'user{}')", i, i)).collect();
    let expected = format!(
        "INSERT INTO `users` (`id`, `name`) VALUES\n{};\n",
        expected_rows.join(",\n")
    );
    assert!(out.text.contains(&expected));
    assert_eq!(out.text.matches("INSERT INTO").count(), 1);
    assert!(out
        .text
        .starts_with("-- dump header\nCREATE TABLE `users` (`id` INT, `name` TEXT);\n"));
}

#[test]
fn test_merge_without_statements_is_identity() {
    let sql = "-- nothing here\r\nCREATE TABLE t (id INT);\r\nSET FOREIGN_KEY_CHECKS = 1;\r\n";
    let out = StatementMerger::new().merge(sql);
    assert!(out.is_passthrough());
    assert!(!out.marker_found);
    assert_eq!(out.text, sql);
}

#[test]
fn test_merge_places_statement_before_marker() {
    let sql = concat!(
        "SET FOREIGN_KEY_CHECKS = 0;\n",
        "CREATE TABLE `t` (id INT);\n",
        "INSERT INTO `t` VALUES (1);\n",
        "INSERT INTO `t` VALUES (2);\n",
        "SET FOREIGN_KEY_CHECKS = 1;\n",
        "-- trailer\n",
    );

    let out = StatementMerger::new().merge(sql);
    assert!(out.marker_found);
    assert_eq!(
        out.text,
        concat!(
            "SET FOREIGN_KEY_CHECKS = 0;\n",
            "CREATE TABLE `t` (id INT);",
            "\n\n-- Merged INSERT statements\n",
            "INSERT INTO `t`  VALUES\n(1),\n(2);\n",
            "\n\n",
            "SET FOREIGN_KEY_CHECKS = 1;\n",
            "-- trailer\n",
        )
    );
}

#[test]
fn test_merge_uses_first_marker_only() {
    let sql = "INSERT INTO t VALUES (1);\nSET FOREIGN_KEY_CHECKS=1;\nSET FOREIGN_KEY_CHECKS=1;\n";
    let out = merge(sql);
    let stmt = out.find("INSERT INTO").unwrap();
    let first_marker = out.find("SET FOREIGN_KEY_CHECKS=1;").unwrap();
    assert!(stmt < first_marker);
    assert!(out.ends_with("SET FOREIGN_KEY_CHECKS=1;\nSET FOREIGN_KEY_CHECKS=1;\n"));
}

#[test]
fn test_merge_without_marker_appends() {
    let sql = "-- a\nINSERT INTO t VALUES (1);\n-- b\nINSERT INTO t VALUES (2);\n-- c\n";
    let out = merge(sql);
    assert_eq!(
        out,
        "-- a\n\n-- b\n\n-- c\n\n\n-- Merged INSERT statements\nINSERT INTO `t`  VALUES\n(1),\n(2);\n"
    );
}

#[test]
fn test_merge_is_stable_on_its_own_output() {
    let sql = "INSERT INTO `t` (a,b) VALUES (1,2);\nINSERT INTO `t` (a,b) VALUES (3,4);\nSET FOREIGN_KEY_CHECKS = 1;\n";
    let once = merge(sql);
    let twice = merge(&once);

    let first = locate_statements(&once);
    let second = locate_statements(&twice);
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);

    let stmt_once = &once[first[0].span()];
    let stmt_twice = &twice[second[0].span()];
    assert_eq!(stmt_once, stmt_twice);
    assert_eq!(stmt_once, "INSERT INTO `t` (a,b) VALUES\n(1,2),\n(3,4);");
}

#[test]
fn test_merge_multiline_statements() {
    let sql = "INSERT INTO `t` (`a`,\n `b`)\nVALUES\n(1,\n 'x');\nINSERT INTO `t` (`a`,\n `b`)\nVALUES (2, 'y');\n";
    let out = StatementMerger::new().merge(sql);
    assert_eq!(out.statements, 2);
    assert!(out
        .text
        .contains("INSERT INTO `t` (`a`,\n `b`) VALUES\n(1,\n 'x'),\n(2, 'y');\n"));
}

#[test]
fn test_merge_drops_schema_from_target() {
    let out = merge("INSERT INTO `shop`.`items` VALUES (1);\nINSERT INTO shop.items VALUES (2);\n");
    assert!(out.contains("INSERT INTO `items`  VALUES\n(1),\n(2);\n"));
}

#[test]
fn test_merge_mixed_tables_use_first_target() {
    let sql = "INSERT INTO `a` (x) VALUES (1);\nINSERT INTO `b` (y) VALUES (2);\n";
    let out = StatementMerger::new().merge(sql);
    assert_eq!(out.table, Some("a"));
    assert_eq!(out.foreign_tables, vec!["b"]);
    assert!(out.text.contains("INSERT INTO `a` (x) VALUES\n(1),\n(2);\n"));
}

#[test]
fn test_merged_statement_accessors() {
    let sql = "INSERT INTO `t` (a) VALUES (1);INSERT INTO `t` (a) VALUES (2);";
    let matches = locate_statements(sql);
    let merged = MergedStatement::from_matches(&matches).unwrap();
    assert_eq!(merged.table(), "t");
    assert_eq!(merged.columns(), "(a)");
    assert_eq!(merged.row_count(), 2);
}

#[test]
fn test_default_comment_text() {
    assert_eq!(StatementMerger::new().comment(), DEFAULT_COMMENT);
    assert!(merge("INSERT INTO t VALUES (1);").contains(&format!("-- {}\n", DEFAULT_COMMENT)));
}
