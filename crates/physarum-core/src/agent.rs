use crate::config::{SensorSampling, SimConfig};
use crate::field::Field;
use crate::vec2::Vec2;
use serde::{Deserialize, Serialize};

/// A single trail-following particle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub position: Vec2,
    /// Direction of travel; conventionally near unit length.
    pub heading: Vec2,
    /// World units per unit time.
    pub speed: f64,
    /// Radians per unit time.
    pub turn_rate: f64,
}

/// Paired sensors mounted symmetrically about the heading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sensors {
    pub distance: f64,
    pub angle: f64,
    pub sampling: SensorSampling,
}

impl Sensors {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            distance: config.sensor_distance,
            angle: config.sensor_angle,
            sampling: config.sensor_sampling,
        }
    }

    pub fn read(&self, field: &Field, at: Vec2) -> f64 {
        match self.sampling {
            SensorSampling::Point => field.sample_at_point(at),
            SensorSampling::Area { radius } => field.sample_in_radius(at, radius),
        }
    }
}

/// Discrete steering decision from a pair of sensor readings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
    Straight,
}

impl Turn {
    /// Hard three-way comparison. Ties and NaN readings keep the heading.
    pub fn decide(left: f64, right: f64) -> Self {
        if left > right {
            Turn::Left
        } else if left < right {
            Turn::Right
        } else {
            Turn::Straight
        }
    }
}

/// Parameters every agent shares within one step.
#[derive(Clone, Copy, Debug)]
pub struct StepParams {
    pub sensors: Sensors,
    /// World extent; the reflecting boundary sits at 0 and here on each axis.
    pub extent: Vec2,
    pub dt: f64,
}

impl StepParams {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            sensors: Sensors::from_config(config),
            extent: Vec2::new(config.world_width as f64, config.world_height as f64),
            dt: config.dt,
        }
    }
}

impl Agent {
    pub fn new(position: Vec2, heading: Vec2, speed: f64, turn_rate: f64) -> Self {
        Self {
            position,
            heading,
            speed,
            turn_rate,
        }
    }

    /// World positions of the (left, right) sensors.
    pub fn sensor_points(&self, sensors: &Sensors) -> (Vec2, Vec2) {
        let reach = self.heading.scaled(sensors.distance);
        (
            self.position + reach.rotated(-sensors.angle),
            self.position + reach.rotated(sensors.angle),
        )
    }

    /// Field readings at the (left, right) sensors.
    pub fn sense(&self, field: &Field, sensors: &Sensors) -> (f64, f64) {
        let (left, right) = self.sensor_points(sensors);
        (sensors.read(field, left), sensors.read(field, right))
    }

    pub fn steer(&mut self, left: f64, right: f64, dt: f64) -> Turn {
        let turn = Turn::decide(left, right);
        match turn {
            Turn::Left => self.heading = self.heading.rotated(-self.turn_rate * dt),
            Turn::Right => self.heading = self.heading.rotated(self.turn_rate * dt),
            Turn::Straight => {}
        }
        turn
    }

    /// Move along the heading, then flip any heading component that points
    /// further out of the world. The position itself is left where it lands.
    pub fn advance(&mut self, dt: f64, extent: Vec2) {
        self.position += self.heading.scaled(self.speed * dt);
        if self.position.x < 0.0 && self.heading.x < 0.0 {
            self.heading.x = -self.heading.x;
        }
        if self.position.y < 0.0 && self.heading.y < 0.0 {
            self.heading.y = -self.heading.y;
        }
        if self.position.x > extent.x && self.heading.x > 0.0 {
            self.heading.x = -self.heading.x;
        }
        if self.position.y > extent.y && self.heading.y > 0.0 {
            self.heading.y = -self.heading.y;
        }
    }

    /// Sense, steer and move against a read-only field. No deposit.
    pub fn plan(&mut self, field: &Field, params: &StepParams) {
        let (left, right) = self.sense(field, &params.sensors);
        self.steer(left, right, params.dt);
        self.advance(params.dt, params.extent);
    }

    /// Full per-agent step: sense, steer, move, reflect, deposit.
    pub fn update(&mut self, field: &mut Field, params: &StepParams, deposit: f64) {
        self.plan(field, params);
        field.deposit(self.position, deposit);
    }

    pub fn is_inside(&self, extent: Vec2) -> bool {
        (0.0..=extent.x).contains(&self.position.x) && (0.0..=extent.y).contains(&self.position.y)
    }
}
