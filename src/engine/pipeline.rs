// ==========================================
// BREEAM & LEED 认证看板 - 有效期计算管道
// ==========================================
// 职责: 标准记录 → 日期规范化 → 到期日 → 剩余月数 → 有效期等级
// 输入: CertificationRecord（只读） + 显式"今天"
// 输出: EvaluatedRecord（每次加载/筛选重新生成）
// ==========================================

use crate::domain::record::{CertificationRecord, EvaluatedRecord};
use crate::domain::types::{DayMonthOrder, ExpiryBasis, SourceKind};
use crate::engine::date_normalizer::DateNormalizer;
use crate::engine::horizon::HorizonCalculator;
use crate::engine::severity::SeverityClassifier;
use chrono::NaiveDate;
use tracing::{debug, instrument};

pub struct ExpiryPipeline {
    today: NaiveDate,
}

impl ExpiryPipeline {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// 记录的到期日计算基准
    ///
    /// - BREEAM: 源字段即到期标记
    /// - LEED: 源字段为认证日期，按体系版本加 5 / 3 年
    pub fn expiry_basis(record: &CertificationRecord) -> ExpiryBasis {
        match record.source {
            Some(SourceKind::LeedSpreadsheet) => ExpiryBasis::YearsAfter(
                HorizonCalculator::years_for_leed_version(record.version_tag.as_deref()),
            ),
            _ => ExpiryBasis::DirectExpiry,
        }
    }

    /// 评估单条记录
    pub fn evaluate(&self, record: CertificationRecord) -> EvaluatedRecord {
        let order = record
            .source
            .map(|s| s.date_order())
            .unwrap_or(DayMonthOrder::DayFirst);
        let normalizer = DateNormalizer::new(order, self.today);

        let parsed_date = normalizer.normalize_text(record.raw_date_text.as_deref());
        let expiry_date = HorizonCalculator::expiry_date(parsed_date, Self::expiry_basis(&record));
        let months_to_expiry = HorizonCalculator::months_left(expiry_date, self.today);
        let bucket = SeverityClassifier::classify(months_to_expiry);

        EvaluatedRecord {
            record,
            parsed_date,
            expiry_date,
            months_to_expiry,
            bucket,
        }
    }

    /// 批量评估
    #[instrument(skip(self, records), fields(count = records.len(), today = %self.today))]
    pub fn evaluate_batch(&self, records: Vec<CertificationRecord>) -> Vec<EvaluatedRecord> {
        let evaluated: Vec<EvaluatedRecord> =
            records.into_iter().map(|r| self.evaluate(r)).collect();

        let undated = evaluated.iter().filter(|r| r.expiry_date.is_none()).count();
        debug!(undated, "有效期计算完成");
        evaluated
    }
}
