//! 业务服务层 - 补偿与财务对账引擎
//!
//! 五个引擎组件，全部为无状态函数集合，直接工作在连接池之上；
//! 所有不变量由存储层条件写保证，进程内不持有可变缓存。
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`allocator`] | 教练档期容量查询（每教练每排期模式一个容量单位） |
//! | [`subscriptions`] | 订阅状态机 + 账本副作用 |
//! | [`sessions`] | 私教课记账（幂等 complete / cancel） |
//! | [`compensation`] | 教练工资核算（delete-then-insert，单事务） |
//! | [`reconciliation`] | 跨组件对账协调（唯一允许跨界调用的模块） |
//! | [`money`] | f64 ↔ Decimal 精度桥接 |

pub mod allocator;
pub mod compensation;
pub mod money;
pub mod reconciliation;
pub mod sessions;
pub mod subscriptions;

/// Monthly session quota per subscription.
///
/// Fixed constant (3 sessions/week patterns × 4 weeks), deliberately NOT
/// derived from days-in-month: both remaining-session reporting and the
/// per-session rate divide by the same number.
pub const SESSIONS_PER_MONTH: i64 = 12;
