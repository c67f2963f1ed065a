// ==========================================
// BREEAM & LEED 认证看板 - 核心库
// ==========================================
// 数据源: BREEAM 注册库 API / BREEAM.xlsx / LEED 项目目录
// 核心链路: 日期规范化 → 剩余月数 → 有效期等级
// 系统定位: 决策支持系统 (只读看板,人工判断)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "pl");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 有效期规则
pub mod engine;

// 导入层 - 表格解析与字段映射
pub mod importer;

// 注册库客户端 - BREEAM API
pub mod registry;

// 地理编码 - Nominatim
pub mod geocode;

// TTL 缓存
pub mod cache;

// 数据仓储层 - 反馈文件
pub mod repository;

// 配置层 - 凭据与路径
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 页面接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DayMonthOrder, ExpiryBasis, ExpiryBucket, SourceKind};

// 领域实体
pub use domain::{CertificationRecord, EvaluatedRecord, FeedbackEntry};

// 引擎
pub use engine::{
    BucketSummary, DateNormalizer, ExpiryPipeline, ExpiryView, HorizonCalculator,
    SeverityClassifier,
};

// API
pub use api::{BreeamApi, BreeamExpiredApi, HomeApi, LeedApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "BREEAM & LEED Monitor";
