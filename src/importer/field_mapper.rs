// ==========================================
// BREEAM & LEED 认证看板 - 字段映射器实现
// ==========================================
// 职责: 源列名（别名表）→ 标准字段
// 规则: 别名按顺序匹配,第一个非空值生效
// ==========================================

use crate::domain::record::{CertificationRecord, RawRow};
use crate::domain::types::SourceKind;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::record_importer_trait::{
    DataCleaner as DataCleanerTrait, FieldMapper as FieldMapperTrait,
};

// ==========================================
// 标准字段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Identity,
    AssetName,
    Country,
    Region,
    City,
    Street,
    Street2,
    Postcode,
    Latitude,
    Longitude,
    System,
    ProjectType,
    Standard,
    Scheme,
    Rating,
    Level,
    VersionTag,
    Assessor,
    PublicUrl,
    RawDate,
}

type AliasTable = &'static [(&'static str, CanonicalField)];

use CanonicalField::*;

// ===== BREEAM.xlsx（已过期认证）=====
const BREEAM_SPREADSHEET_ALIASES: AliasTable = &[
    ("Nazwa budynku", AssetName),
    ("Rodzaj budynku", ProjectType),
    ("System", System),
    ("Standard", Standard),
    ("Scheme", Scheme),
    ("Rating", Rating),
    ("Status/Data ważności", RawDate),
    ("Województwo", Region),
    ("Miasto", City),
    ("Adres", Street),
    ("Audytor/Assesor", Assessor),
    ("Assessor/Auditor", Assessor),
    ("Assessor", Assessor),
    ("Kraj", Country),
    ("Country", Country),
    ("Kod pocztowy", Postcode),
    ("Postcode", Postcode),
    ("Zipcode", Postcode),
];

// ===== PublicLEEDProjectDirectory.xlsx =====
const LEED_SPREADSHEET_ALIASES: AliasTable = &[
    ("Project Name", AssetName),
    ("ProjectName", AssetName),
    ("Name", AssetName),
    ("Country", Country),
    ("City", City),
    ("State/Province", Region),
    ("State", Region),
    ("LEEDSystemVersion", VersionTag),
    ("LEED System Version", VersionTag),
    ("LEED Rating System", Rating),
    ("Rating System", Rating),
    ("LEED Certification Level", Level),
    ("Certification Level", Level),
    ("CertLevel", Level),
    ("Project ID", Identity),
    ("ID", Identity),
    ("URL", PublicUrl),
    ("Certification Date", RawDate),
    ("CertDate", RawDate),
    ("Award Date", RawDate),
    ("Street", Street),
    ("Address", Street),
    ("Address1", Street),
    ("Street Address", Street),
    ("Zipcode", Postcode),
    ("ZIP", Postcode),
    ("PostalCode", Postcode),
    ("Postal Code", Postcode),
];

// ===== BREEAM 注册库 API（assessment 对象）=====
const BREEAM_API_ALIASES: AliasTable = &[
    ("buildingName", AssetName),
    ("name", AssetName),
    ("certNo", Identity),
    ("country", Country),
    ("city", City),
    ("town", City),
    ("county", Region),
    ("region", Region),
    ("state", Region),
    ("regAddresLine1", Street),
    ("regAddressLine1", Street),
    ("addressLine1", Street),
    ("address", Street),
    ("Address1", Street),
    ("Address", Street),
    ("regAddresLine2", Street2),
    ("regAddressLine2", Street2),
    ("addressLine2", Street2),
    ("Address2", Street2),
    ("postcode", Postcode),
    ("postCode", Postcode),
    ("zip", Postcode),
    ("zipCode", Postcode),
    ("postalCode", Postcode),
    ("PostalCode", Postcode),
    ("projectType", ProjectType),
    ("scheme", Scheme),
    ("standard", Standard),
    ("stage", RawDate),
    ("assessor", Assessor),
    ("assessorAuditor", Assessor),
    ("assessorName", Assessor),
    ("auditor", Assessor),
    ("publicUrl", PublicUrl),
    ("latitude", Latitude),
    ("lat", Latitude),
    ("longitude", Longitude),
    ("lon", Longitude),
    ("lng", Longitude),
];

pub struct FieldMapper;

impl FieldMapper {
    /// 来源对应的别名表
    pub fn aliases(source: SourceKind) -> AliasTable {
        match source {
            SourceKind::BreeamApi => BREEAM_API_ALIASES,
            SourceKind::BreeamSpreadsheet => BREEAM_SPREADSHEET_ALIASES,
            SourceKind::LeedSpreadsheet => LEED_SPREADSHEET_ALIASES,
        }
    }

    /// 别名表中完全缺失的标准字段（用于导入告警）
    pub fn missing_fields(headers: &[&str], source: SourceKind) -> Vec<CanonicalField> {
        let mut missing: Vec<CanonicalField> = Vec::new();
        for (_, field) in Self::aliases(source) {
            if missing.contains(field) {
                continue;
            }
            let present = Self::aliases(source)
                .iter()
                .filter(|(_, f)| f == field)
                .any(|(alias, _)| headers.contains(alias));
            if !present {
                missing.push(*field);
            }
        }
        missing
    }

    fn slot(record: &mut CertificationRecord, field: CanonicalField) -> Option<&mut Option<String>> {
        let slot = match field {
            Identity => &mut record.identity,
            AssetName => &mut record.asset_name,
            Country => &mut record.country,
            Region => &mut record.region,
            City => &mut record.city,
            Street => &mut record.street,
            Street2 => &mut record.street2,
            Postcode => &mut record.postcode,
            System => &mut record.system,
            ProjectType => &mut record.project_type,
            Standard => &mut record.standard,
            Scheme => &mut record.scheme,
            Rating => &mut record.rating,
            Level => &mut record.level,
            VersionTag => &mut record.version_tag,
            Assessor => &mut record.assessor,
            PublicUrl => &mut record.public_url,
            RawDate => &mut record.raw_date_text,
            Latitude | Longitude => return None,
        };
        Some(slot)
    }
}

impl FieldMapperTrait for FieldMapper {
    fn map_to_record(
        &self,
        row: &RawRow,
        source: SourceKind,
        row_number: usize,
    ) -> CertificationRecord {
        let cleaner = DataCleaner;
        let mut record = CertificationRecord {
            source: Some(source),
            row_number,
            ..Default::default()
        };

        for (alias, field) in Self::aliases(source) {
            let Some(raw) = row.get(*alias) else {
                continue;
            };

            match field {
                Latitude => {
                    if record.latitude.is_none() {
                        record.latitude = cleaner.parse_coordinate(raw, 90.0);
                    }
                }
                Longitude => {
                    if record.longitude.is_none() {
                        record.longitude = cleaner.parse_coordinate(raw, 180.0);
                    }
                }
                _ => {
                    if let Some(slot) = Self::slot(&mut record, *field) {
                        if slot.is_none() {
                            *slot = cleaner.clean_token(raw);
                        }
                    }
                }
            }
        }

        if record.system.is_none() {
            record.system = Some(source.system().to_string());
        }

        record
    }
}
