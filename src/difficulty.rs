use num_bigint::BigUint;

/// 初始目标值 0x00000000FFFF...FF（共 64 个十六进制位）
pub fn initial_target() -> BigUint {
    (BigUint::from(1u32) << 224u32) - 1u32
}

/// 校正系数（分子, 分母, 显示标签）
pub const CORRECTION_FACTORS: [(u32, u32, &str); 7] = [
    (1, 4, "1/4"),
    (2, 4, "2/4"),
    (3, 4, "3/4"),
    (1, 1, "1"),
    (2, 1, "2"),
    (3, 1, "3"),
    (4, 1, "4"),
];

/// 第二轮以系数 3 的结果为基准
pub const SECOND_ROUND_MULTIPLIER: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RescaledTarget {
    pub label: &'static str,
    pub target: BigUint,
}

impl RescaledTarget {
    /// `"{label:<3}: {target:064X}"`
    pub fn format_line(&self) -> String {
        format!("{:<3}: {:064X}", self.label, self.target)
    }
}

/// floor(target * numerator / denominator)，整数运算，无浮点误差
pub fn rescale(target: &BigUint, numerator: u32, denominator: u32) -> BigUint {
    target * numerator / denominator
}

pub fn rescale_round(base: &BigUint) -> Vec<RescaledTarget> {
    CORRECTION_FACTORS
        .iter()
        .map(|(numerator, denominator, label)| RescaledTarget {
            label: *label,
            target: rescale(base, *numerator, *denominator),
        })
        .collect()
}

/// 两轮计算：第一轮基于初始目标，第二轮基于初始目标 * 3
pub fn recompute() -> (Vec<RescaledTarget>, Vec<RescaledTarget>) {
    let base = initial_target();
    let first = rescale_round(&base);
    let second = rescale_round(&(&base * SECOND_ROUND_MULTIPLIER));
    (first, second)
}

/// 生成与打印输出一致的文本行
pub fn report_lines() -> Vec<String> {
    let (first, second) = recompute();
    let mut lines: Vec<String> = first.iter().map(RescaledTarget::format_line).collect();
    lines.push("-".repeat(80));
    lines.extend(second.iter().map(RescaledTarget::format_line));
    lines
}
