#![allow(dead_code)]

use _core::Dataset;

pub const BANNER: &str = "Employee attrition export (HR internal)";

/// Source headers, legacy vocabulary.
pub const HEADERS: [&str; 10] = [
    "部門", "職位", "加班", "出差頻率", "工作滿意度", "月薪", "年齡", "性別", "年資", "離職",
];

/// Ten employees: three leavers, all of them working overtime; four
/// overtime workers; two fully satisfied employees, neither of whom left.
/// Lowest salary is 2800.
pub const ROWS: [[&str; 10]; 10] = [
    ["Sales", "Sales Executive", "是", "Travel_Rarely", "1", "3200", "24", "男", "1", "是"],
    ["Sales", "Sales Representative", "是", "Travel_Frequently", "2", "2800", "29", "女", "2", "是"],
    ["R&D", "Research Scientist", "是", "Travel_Rarely", "2", "4100", "35", "男", "5", "是"],
    ["R&D", "Laboratory Technician", "是", "Non-Travel", "3", "3900", "41", "女", "8", "否"],
    ["HR", "Human Resources", "否", "Travel_Rarely", "4", "5200", "45", "女", "12", "否"],
    ["R&D", "Research Scientist", "否", "Non-Travel", "4", "6100", "38", "男", "10", "否"],
    ["Sales", "Sales Executive", "否", "Travel_Rarely", "3", "4800", "33", "男", "6", "否"],
    ["HR", "Human Resources", "否", "Travel_Frequently", "2", "3500", "27", "女", "3", "否"],
    ["R&D", "Manager", "否", "Travel_Rarely", "3", "9800", "52", "男", "20", "否"],
    ["Sales", "Manager", "否", "Non-Travel", "1", "8700", "49", "女", "15", "否"],
];

pub const MIN_SALARY: i64 = 2800;

pub const OPTIONAL_HEADERS: [&str; 7] = ["職位", "加班", "出差頻率", "工作滿意度", "年齡", "性別", "年資"];

/// CSV with a banner line, keeping the columns whose source header passes `keep`
/// and renaming headers through `rename`.
pub fn csv_where(keep: impl Fn(&str) -> bool, rename: impl Fn(&str) -> String) -> String {
    let columns: Vec<usize> = (0..HEADERS.len()).filter(|&i| keep(HEADERS[i])).collect();
    let mut out = String::new();
    out.push_str(BANNER);
    out.push('\n');
    let header: Vec<String> = columns.iter().map(|&i| rename(HEADERS[i])).collect();
    out.push_str(&header.join(","));
    out.push('\n');
    for row in ROWS.iter() {
        let cells: Vec<&str> = columns.iter().map(|&i| row[i]).collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

pub fn full_csv() -> String {
    csv_where(|_| true, |h| h.to_string())
}

pub fn required_only_csv() -> String {
    csv_where(|h| !OPTIONAL_HEADERS.contains(&h), |h| h.to_string())
}

pub fn without_csv(header: &str) -> String {
    csv_where(|h| h != header, |h| h.to_string())
}

pub fn dataset(csv: &str) -> Dataset {
    Dataset::from_bytes(csv.as_bytes(), 1).expect("fixture should load")
}
