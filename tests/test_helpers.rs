// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的临时表格文件、固定日期等
// ==========================================

#![allow(dead_code)]

use chrono::NaiveDate;
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

/// 固定参考日期
pub fn today() -> NaiveDate {
    ymd(2024, 3, 15)
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 创建临时 CSV 文件
///
/// # 返回
/// - NamedTempFile: 临时文件（需要保持存活）
pub fn create_test_csv(header: &str, rows: &[&str]) -> NamedTempFile {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "{}", header).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}

/// BREEAM.xlsx 导出为 CSV 的样例
pub fn breeam_sheet() -> NamedTempFile {
    create_test_csv(
        "Nazwa budynku,Rodzaj budynku,Status/Data ważności,Województwo,Miasto,Adres,Audytor/Assesor",
        &[
            "Biurowiec A,Office,10.03.2023,mazowieckie,Warszawa,ul. Prosta 1,Jan Nowak",
            "Magazyn B,Industrial,20.09.2024,łódzkie,Stryków,ul. Polna 5,",
            "Hala C,Industrial,Wygasł 01.02.2024,śląskie,Katowice,,Anna Kowalska",
            "Centrum D,Retail,,małopolskie,Kraków,al. Pokoju 44,",
        ],
    )
}

/// PublicLEEDProjectDirectory 导出为 CSV 的样例
pub fn leed_sheet() -> NamedTempFile {
    create_test_csv(
        "ID,Project Name,Street,City,State,Zipcode,Country,LEEDSystemVersion,Certification Date,CertLevel",
        &[
            "1000001,Alpha Tower,Prosta 20,Warszawa,Mazowieckie,00-850,Poland,v2009,06/01/2021,Gold",
            "1000002,Beta Park,Wielicka 28,Kraków,,30-552,Poland,v4,03/04/2020,Silver",
            "1000003,Gamma Hub,Unter den Linden 1,Berlin,,10117,Germany,v4.1,2023-06-01,Platinum",
            "1000004,Delta Hall,Piotrkowska 1,Łódź,,,Poland,v4,,Certified",
        ],
    )
}
