// zd-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, MassRate as UomMassRate, Power as UomPower, Pressure as UomPressure,
    ThermodynamicTemperature as UomThermodynamicTemperature, Time as UomTime,
    Volume as UomVolume,
};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type MassRate = UomMassRate;
pub type Power = UomPower;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;
pub type Volume = UomVolume;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn m2(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

#[inline]
pub fn m3(v: f64) -> Volume {
    use uom::si::volume::cubic_meter;
    Volume::new::<cubic_meter>(v)
}

#[inline]
pub fn watts(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = pa(101_325.0);
        let _t = k(300.0);
        let _mdot = kgps(1.2);
        let _a = m2(0.5);
        let _v = m3(2.0);
        let _q = watts(10.0);
        let _dt = s(0.1);
    }

    #[test]
    fn values_are_stored_in_si() {
        assert_eq!(pa(2.0).value, 2.0);
        assert_eq!(k(300.0).value, 300.0);
        assert_eq!(m3(0.25).value, 0.25);
    }
}
