pub mod weight_initializer;
