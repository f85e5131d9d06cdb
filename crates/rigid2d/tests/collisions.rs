use approx::assert_relative_eq;
use rigid2d::dynamics::{BodyHandle, CollisionResponse, Gravity, IntegrationParameters, RigidBody};
use rigid2d::math::{Point, Vector};
use rigid2d::pipeline::PhysicsWorld;
use rigid2d::shape::SharedShape;

fn floor() -> RigidBody {
    RigidBody::stationary(SharedShape::rectangle(20.0, 1.0).unwrap())
        .with_position(Point::new(0.0, -0.5))
        .with_restitution(1.0)
}

fn ball(x: f64, vx: f64) -> RigidBody {
    RigidBody::mobile(SharedShape::ball(1.0), 1.0)
        .with_position(Point::new(x, 0.0))
        .with_linvel(Vector::new(vx, 0.0))
        .with_restitution(1.0)
}

#[test]
fn ball_bounces_off_the_floor() {
    let mut world = PhysicsWorld::new(IntegrationParameters::default()).unwrap();
    let floor = world.insert_body(floor()).unwrap();
    let ball = world
        .insert_body(
            RigidBody::mobile(SharedShape::ball(1.0), 1.0)
                .with_position(Point::new(0.0, 1.505))
                .with_restitution(1.0),
        )
        .unwrap();
    let _ = world.insert_force_generator(Gravity::new(Vector::new(0.0, -0.01)));

    let mut bounces = 0;
    for _ in 0..20 {
        world.step().unwrap();

        let gap = world.body_position(ball).unwrap().y - 1.0;
        assert!(gap >= -world.params().contact_tolerance);

        for contact in world.contacts() {
            assert_eq!((contact.body1, contact.body2), (floor, ball));
            assert_relative_eq!(*contact.normal, -Vector::y(), epsilon = 1.0e-9);
            assert_relative_eq!(contact.relative_velocity, -0.1, epsilon = 1.0e-9);
            bounces += 1;
        }
    }

    // Back at the apex, with the same energy.
    assert_eq!(bounces, 1);
    assert_relative_eq!(world.body_position(ball).unwrap().y, 1.505, epsilon = 1.0e-4);
    assert_relative_eq!(world.body_linvel(ball).unwrap().y, 0.0, epsilon = 1.0e-4);
}

#[test]
fn elastic_head_on_collision_swaps_velocities() {
    let mut world = PhysicsWorld::default();
    let a = world.insert_body(ball(0.0, 0.1)).unwrap();
    let b = world.insert_body(ball(2.205, -0.1)).unwrap();

    world.step().unwrap();
    assert!(world.contacts().is_empty());
    world.step().unwrap();
    assert_eq!(world.contacts().len(), 1);

    let va = world.body_linvel(a).unwrap();
    let vb = world.body_linvel(b).unwrap();
    assert_relative_eq!(va, Vector::new(-0.1, 0.0), epsilon = 1.0e-4);
    assert_relative_eq!(vb, Vector::new(0.1, 0.0), epsilon = 1.0e-4);
    assert_relative_eq!(va + vb, Vector::zeros(), epsilon = 1.0e-9);
}

#[test]
fn sticky_handler_stops_the_bodies() {
    let mut world = PhysicsWorld::default();
    let a = world
        .insert_body(ball(0.0, 0.1).with_collision_handler(
            |_: BodyHandle, _: BodyHandle, _: &Point<f64>| CollisionResponse::Sticky,
        ))
        .unwrap();
    let b = world.insert_body(ball(2.205, -0.1)).unwrap();

    world.step().unwrap();
    world.step().unwrap();

    assert_eq!(world.contacts()[0].response, CollisionResponse::Sticky);
    let relative = world.body_linvel(a).unwrap() - world.body_linvel(b).unwrap();
    assert_relative_eq!(relative.x, 0.0, epsilon = 1.0e-4);
}

#[test]
fn ignoring_handler_lets_the_bodies_through() {
    let mut world = PhysicsWorld::default();
    let a = world.insert_body(ball(0.0, 0.1)).unwrap();
    let b = world
        .insert_body(ball(2.205, -0.1).with_collision_handler(
            |_: BodyHandle, _: BodyHandle, _: &Point<f64>| CollisionResponse::Ignore,
        ))
        .unwrap();

    world.step().unwrap();
    world.step().unwrap();

    assert_eq!(world.contacts().len(), 1);
    assert_eq!(world.contacts()[0].response, CollisionResponse::Ignore);
    assert_relative_eq!(world.body_linvel(a).unwrap().x, 0.1);
    assert_relative_eq!(world.body_linvel(b).unwrap().x, -0.1);
}

#[test]
fn suppressed_pairs_never_collide() {
    let mut world = PhysicsWorld::default();
    let a = world.insert_body(ball(0.0, 0.1)).unwrap();
    let b = world.insert_body(ball(2.205, -0.1)).unwrap();
    world.set_no_collisions(b, a).unwrap();

    for _ in 0..4 {
        world.step().unwrap();
        assert!(world.contacts().is_empty());
    }

    world.remove_no_collisions(a, b);
    assert_relative_eq!(world.body_linvel(a).unwrap().x, 0.1);
}

#[test]
fn falling_box_is_backtracked_to_its_impact() {
    let mut world = PhysicsWorld::default();
    let floor = world.insert_body(floor()).unwrap();
    let cube = world
        .insert_body(
            RigidBody::mobile(SharedShape::rectangle(1.0, 1.0).unwrap(), 1.0)
                .with_position(Point::new(0.0, 0.7))
                .with_linvel(Vector::new(0.0, -0.3))
                .with_restitution(1.0),
        )
        .unwrap();

    // The box ends the first step sunk into the floor.
    world.step().unwrap();
    assert!(world.contacts().is_empty());
    assert_relative_eq!(world.body_position(cube).unwrap().y, 0.4, epsilon = 1.0e-12);

    // The next step finds the moment of impact and bounces the box back.
    world.step().unwrap();
    assert_eq!(world.contacts().len(), 1);
    assert_eq!(world.contacts()[0].body1, floor);
    assert_relative_eq!(world.contacts()[0].relative_velocity, -0.3, epsilon = 1.0e-9);
    assert_relative_eq!(world.body_linvel(cube).unwrap(), Vector::new(0.0, 0.3), epsilon = 1.0e-4);
    assert_relative_eq!(world.body_position(cube).unwrap().y, 0.7, epsilon = 1.0e-4);
    assert_relative_eq!(world.body_angvel(cube).unwrap(), 0.0, epsilon = 1.0e-6);
}

#[test]
fn teleported_box_is_backtracked_from_its_new_pose() {
    let mut world = PhysicsWorld::default();
    let floor = world.insert_body(floor()).unwrap();
    let cube = world
        .insert_body(
            RigidBody::mobile(SharedShape::rectangle(1.0, 1.0).unwrap(), 1.0)
                .with_position(Point::new(30.0, 0.7))
                .with_linvel(Vector::new(0.0, -0.3))
                .with_restitution(1.0),
        )
        .unwrap();

    // Far beside the floor, nothing happens.
    world.step().unwrap();
    assert!(world.contacts().is_empty());

    // Dropped into the floor, the box is backtracked along its velocity
    // from where it was put, not from where it came from.
    world.set_body_pose(cube, Point::new(0.0, 0.4), 0.0).unwrap();
    world.step().unwrap();

    assert_eq!(world.contacts().len(), 1);
    assert_eq!(world.contacts()[0].body1, floor);
    assert_relative_eq!(world.contacts()[0].relative_velocity, -0.3, epsilon = 1.0e-9);
    assert_relative_eq!(world.body_linvel(cube).unwrap(), Vector::new(0.0, 0.3), epsilon = 1.0e-4);
    assert_relative_eq!(world.body_position(cube).unwrap(), Point::new(0.0, 0.7), epsilon = 1.0e-4);
}

#[test]
fn deeply_interpenetrating_mobile_boxes_are_left_alone() {
    let mut world = PhysicsWorld::default();
    let square = SharedShape::rectangle(2.0, 2.0).unwrap();
    let a = world.insert_body(RigidBody::mobile(square.clone(), 1.0)).unwrap();
    let b = world
        .insert_body(
            RigidBody::mobile(square, 1.0)
                .with_position(Point::new(0.2, 0.3))
                .with_orientation(0.1),
        )
        .unwrap();

    for _ in 0..3 {
        world.step().unwrap();
        assert!(world.contacts().is_empty());
    }

    assert_relative_eq!(world.body_position(a).unwrap(), Point::origin());
    assert_relative_eq!(world.body_position(b).unwrap(), Point::new(0.2, 0.3));
}
