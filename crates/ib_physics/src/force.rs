// crates/ib_physics/src/force.rs

//! 边界净受力

use serde::Serialize;

use crate::state::State;

/// 某一时刻的边界净受力
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NetForce {
    /// 时间步编号
    pub step: u64,
    /// 时间
    pub time: f64,
    /// x 方向分量之和
    pub fx: f64,
    /// y 方向分量之和
    pub fy: f64,
}

impl NetForce {
    /// 对状态中全部边界点求和
    pub fn from_state(state: &State) -> Self {
        Self {
            step: state.step,
            time: state.time,
            fx: state.fx().iter().sum(),
            fy: state.fy().iter().sum(),
        }
    }

    /// 阻力系数（单位来流、单位长度下为 2 倍合力）
    #[inline]
    pub fn drag(&self) -> f64 {
        2.0 * self.fx
    }

    /// 升力系数
    #[inline]
    pub fn lift(&self) -> f64 {
        2.0 * self.fy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_force_sums_components() {
        let mut state = State::new(2, 2, 3);
        state.step = 4;
        state.time = 0.4;
        state.f = vec![1.0, 2.0, 3.0, -0.5, -0.5, 0.25];

        let force = NetForce::from_state(&state);
        assert_eq!(force.step, 4);
        assert!((force.fx - 6.0).abs() < 1e-12);
        assert!((force.fy + 0.75).abs() < 1e-12);
        assert!((force.drag() - 12.0).abs() < 1e-12);
        assert!((force.lift() + 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_no_points_gives_zero_force() {
        let force = NetForce::from_state(&State::new(3, 3, 0));
        assert_eq!(force.fx, 0.0);
        assert_eq!(force.fy, 0.0);
    }
}
